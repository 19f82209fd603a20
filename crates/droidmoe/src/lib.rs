mod parser;
pub mod mods;
pub mod scraper;
pub mod types;

pub use parser::ParseError;
pub use scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://osudroid.moe";
