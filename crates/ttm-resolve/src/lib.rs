pub mod error;
pub mod fuzzy;
pub mod gazetteer;
pub mod intake;
pub mod maps;
pub mod parse;
mod parse_helpers;
pub mod resolver;
pub mod speech;
pub mod suggest;

pub use error::RecognitionError;
pub use fuzzy::{edit_distance, normalize, similarity};
pub use gazetteer::{merge_layers, Gazetteer};
pub use intake::{scan_ticket, PlainTextRecognizer, ScanOutcome, TextRecognizer};
pub use maps::{build_app_url, build_maps_url};
pub use parse::{
    clean_lines, extract_address_and_city, extract_notes, extract_phone, extract_time,
    parse_ticket_text, AddressAndCity, ParseResult,
};
pub use resolver::{rank_candidates, score_address, Completion, Resolver, StopDraft};
pub use speech::{extract_from_speech, SpeechExtraction};
pub use suggest::{rank_city_streets, suggest_streets};
