pub mod game_splits_extractor;
pub mod game_url_extractor;
pub mod record_parser;
pub mod split_schema;
pub mod table_writer;

pub use game_splits_extractor::{GameSplitsExtractor, SplitFragments};
pub use game_url_extractor::{parse_game_url, GameUrlExtractor, SelectorStrategy};
pub use record_parser::{parse_pitcher_name, parse_record, ParsedRecord};
pub use split_schema::{resolve_categories, Categories, SPLIT_SCHEMA};
pub use table_writer::{parse_table, to_table, TableRecord};
