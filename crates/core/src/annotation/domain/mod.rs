pub mod breakdown;
pub mod video_annotator;
