//! `amask` namespace for the ANIME command
//!
//! 56-bit mask, seven bytes, documented byte layout. OR the constants
//! together to select fields; [`FIELDS`] lists them in wire order.

use crate::protocol::fields::FieldKind;
use crate::protocol::masks::MaskBit;

// Byte 1
pub const AID: u64 = 1 << 55;
pub const DATE_FLAGS: u64 = 1 << 54;
pub const YEAR: u64 = 1 << 53;
pub const TYPE: u64 = 1 << 52;
pub const RELATED_AID_LIST: u64 = 1 << 51;
pub const RELATED_AID_TYPE: u64 = 1 << 50;

// Byte 2
pub const ROMAJI_NAME: u64 = 1 << 47;
pub const KANJI_NAME: u64 = 1 << 46;
pub const ENGLISH_NAME: u64 = 1 << 45;
pub const OTHER_NAME: u64 = 1 << 44;
pub const SHORT_NAME: u64 = 1 << 43;
pub const SYNONYM_LIST: u64 = 1 << 42;

// Byte 3
pub const EPISODES: u64 = 1 << 39;
pub const HIGHEST_EPISODE_NUMBER: u64 = 1 << 38;
pub const SPECIAL_EP_COUNT: u64 = 1 << 37;
pub const AIR_DATE: u64 = 1 << 36;
pub const END_DATE: u64 = 1 << 35;
pub const URL: u64 = 1 << 34;
pub const PICNAME: u64 = 1 << 33;

// Byte 4
pub const RATING: u64 = 1 << 31;
pub const VOTE_COUNT: u64 = 1 << 30;
pub const TEMP_RATING: u64 = 1 << 29;
pub const TEMP_VOTE: u64 = 1 << 28;
pub const AVERAGE_VIEW_RATING: u64 = 1 << 27;
pub const REVIEW_COUNT: u64 = 1 << 26;
pub const AWARD_LIST: u64 = 1 << 25;
pub const IS_18_RESTRICTED: u64 = 1 << 24;

// Byte 5
pub const ANN_ID: u64 = 1 << 22;
pub const ALLCINEMA_ID: u64 = 1 << 21;
pub const ANIME_NFO_ID: u64 = 1 << 20;
pub const TAG_NAME_LIST: u64 = 1 << 19;
pub const TAG_ID_LIST: u64 = 1 << 18;
pub const TAG_WEIGHT_LIST: u64 = 1 << 17;
pub const DATE_RECORD_UPDATED: u64 = 1 << 16;

// Byte 6
pub const CHARACTER_ID_LIST: u64 = 1 << 15;

// Byte 7
pub const SPECIALS_COUNT: u64 = 1 << 7;
pub const CREDITS_COUNT: u64 = 1 << 6;
pub const OTHER_COUNT: u64 = 1 << 5;
pub const TRAILER_COUNT: u64 = 1 << 4;
pub const PARODY_COUNT: u64 = 1 << 3;

/// Bit-to-field table, most significant bit first
pub static FIELDS: &[MaskBit] = &[
    // Byte 1
    MaskBit::new(AID, "aid", FieldKind::Int),
    MaskBit::new(DATE_FLAGS, "date_flags", FieldKind::Int),
    MaskBit::new(YEAR, "year", FieldKind::Str),
    MaskBit::new(TYPE, "type", FieldKind::Str),
    MaskBit::new(RELATED_AID_LIST, "related_aid_list", FieldKind::StrList),
    MaskBit::new(RELATED_AID_TYPE, "related_aid_type", FieldKind::Str),
    // Byte 2
    MaskBit::new(ROMAJI_NAME, "romaji_name", FieldKind::Str),
    MaskBit::new(KANJI_NAME, "kanji_name", FieldKind::Str),
    MaskBit::new(ENGLISH_NAME, "english_name", FieldKind::Str),
    MaskBit::new(OTHER_NAME, "other_name", FieldKind::Str),
    MaskBit::new(SHORT_NAME, "short_name", FieldKind::StrList),
    MaskBit::new(SYNONYM_LIST, "synonym_list", FieldKind::StrList),
    // Byte 3
    MaskBit::new(EPISODES, "episodes", FieldKind::Int),
    MaskBit::new(
        HIGHEST_EPISODE_NUMBER,
        "highest_episode_number",
        FieldKind::Int,
    ),
    MaskBit::new(SPECIAL_EP_COUNT, "special_ep_count", FieldKind::Int),
    MaskBit::new(AIR_DATE, "air_date", FieldKind::Date),
    MaskBit::new(END_DATE, "end_date", FieldKind::Date),
    MaskBit::new(URL, "url", FieldKind::Str),
    MaskBit::new(PICNAME, "picname", FieldKind::Str),
    // Byte 4
    MaskBit::new(RATING, "rating", FieldKind::Int),
    MaskBit::new(VOTE_COUNT, "vote_count", FieldKind::Int),
    MaskBit::new(TEMP_RATING, "temp_rating", FieldKind::Int),
    MaskBit::new(TEMP_VOTE, "temp_vote", FieldKind::Int),
    MaskBit::new(AVERAGE_VIEW_RATING, "average_view_rating", FieldKind::Int),
    MaskBit::new(REVIEW_COUNT, "review_count", FieldKind::Int),
    MaskBit::new(AWARD_LIST, "award_list", FieldKind::Str),
    MaskBit::new(IS_18_RESTRICTED, "is_18_restricted", FieldKind::Bool),
    // Byte 5
    MaskBit::new(ANN_ID, "ann_id", FieldKind::Int),
    MaskBit::new(ALLCINEMA_ID, "allcinema_id", FieldKind::Int),
    MaskBit::new(ANIME_NFO_ID, "anime_nfo_id", FieldKind::Str),
    MaskBit::new(TAG_NAME_LIST, "tag_name_list", FieldKind::StrList),
    MaskBit::new(TAG_ID_LIST, "tag_id_list", FieldKind::IntList),
    MaskBit::new(TAG_WEIGHT_LIST, "tag_weight_list", FieldKind::IntList),
    MaskBit::new(DATE_RECORD_UPDATED, "date_record_updated", FieldKind::Date),
    // Byte 6
    MaskBit::new(CHARACTER_ID_LIST, "character_id_list", FieldKind::IntList),
    // Byte 7
    MaskBit::new(SPECIALS_COUNT, "specials_count", FieldKind::Int),
    MaskBit::new(CREDITS_COUNT, "credits_count", FieldKind::Int),
    MaskBit::new(OTHER_COUNT, "other_count", FieldKind::Int),
    MaskBit::new(TRAILER_COUNT, "trailer_count", FieldKind::Int),
    MaskBit::new(PARODY_COUNT, "parody_count", FieldKind::Int),
];
