pub mod headshot_source;
