pub mod video_indexer_client;
