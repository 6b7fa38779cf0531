//! Typed decoding over the full client pipeline

mod common;

use anidb_udp::protocol::masks::anime;
use anidb_udp::{AnimeQuery, FieldValue};
use common::{LOGIN_ACCEPTED, login, scripted_client};

#[tokio::test]
async fn masked_anime_reply_decodes_in_mask_order() {
    let (client, transport) = scripted_client(&[
        LOGIN_ACCEPTED,
        "230 ANIME\n5975|2008-2008|TV Series|To Aru Majutsu no Index|24|36,2609,2610",
    ]);
    login(&client).await;

    let mask = anime::AID
        | anime::YEAR
        | anime::TYPE
        | anime::ROMAJI_NAME
        | anime::EPISODES
        | anime::TAG_ID_LIST;
    let result = client
        .anime(AnimeQuery::ById(5975), mask, false)
        .await
        .unwrap();

    assert_eq!(result.code, 230);
    assert!(result.field_errors.is_empty());
    assert_eq!(result.get("aid").and_then(FieldValue::as_int), Some(5975));
    assert_eq!(
        result.get("year").and_then(FieldValue::as_str),
        Some("2008-2008")
    );
    assert_eq!(
        result.get("type").and_then(FieldValue::as_str),
        Some("TV Series")
    );
    assert_eq!(
        result.get("romaji_name").and_then(FieldValue::as_str),
        Some("To Aru Majutsu no Index")
    );
    assert_eq!(result.get("episodes").and_then(FieldValue::as_int), Some(24));
    assert_eq!(
        result.get("tag_id_list").and_then(FieldValue::as_int_list),
        Some(&[36, 2609, 2610][..])
    );

    assert!(transport.sent()[1].contains("aid=5975"));
    assert!(transport.sent()[1].contains("amask="));
}

#[tokio::test]
async fn short_masked_reply_omits_missing_fields() {
    let (client, _transport) = scripted_client(&[LOGIN_ACCEPTED, "230 ANIME\n17"]);
    login(&client).await;

    let mask = anime::AID | anime::ROMAJI_NAME;
    let result = client
        .anime(AnimeQuery::ById(17), mask, false)
        .await
        .unwrap();

    assert_eq!(result.get("aid").and_then(FieldValue::as_int), Some(17));
    assert!(
        result.get("romaji_name").is_none(),
        "absent fields are omitted, never defaulted"
    );
}

#[tokio::test]
async fn undecodable_field_is_omitted_and_reported() {
    let (client, _transport) =
        scripted_client(&[LOGIN_ACCEPTED, "230 ANIME\nnot-a-number|Title"]);
    login(&client).await;

    let mask = anime::AID | anime::ROMAJI_NAME;
    let result = client
        .anime(AnimeQuery::ById(1), mask, false)
        .await
        .unwrap();

    assert!(result.get("aid").is_none());
    assert_eq!(
        result.get("romaji_name").and_then(FieldValue::as_str),
        Some("Title")
    );
    assert_eq!(result.field_errors.len(), 1);
    assert_eq!(result.field_errors[0].field, "aid");
    assert_eq!(result.field_errors[0].record, 0);
}

#[tokio::test]
async fn character_reply_decodes_fixed_template() {
    let (client, _transport) = scripted_client(&[
        LOGIN_ACCEPTED,
        "235 CHARACTER\n488|\u{6ac2}\u{679d}\u{5b9f}\u{4e43}\u{68a8}|Kushieda Minori|16785.jpg|5101,1,2782,1'5427,0,2782,0|123,124|1231027200|1|F",
    ]);
    login(&client).await;

    let result = client.character(488, false).await.unwrap();
    assert_eq!(result.code, 235);
    assert!(result.field_errors.is_empty());
    assert_eq!(result.get("charid").and_then(FieldValue::as_int), Some(488));
    assert_eq!(
        result
            .get("name_transcription")
            .and_then(FieldValue::as_str),
        Some("Kushieda Minori")
    );
    assert_eq!(
        result.get("anime_blocks").and_then(FieldValue::as_str_list),
        Some(
            &[
                "5101,1,2782,1".to_string(),
                "5427,0,2782,0".to_string()
            ][..]
        )
    );
    assert_eq!(
        result.get("episode_list").and_then(FieldValue::as_int_list),
        Some(&[123, 124][..])
    );
    assert_eq!(
        result
            .get("last_updated_date")
            .and_then(FieldValue::as_date)
            .map(|date| date.timestamp()),
        Some(1231027200)
    );
    assert_eq!(result.get("gender").and_then(FieldValue::as_str), Some("F"));
}

#[tokio::test]
async fn empty_list_field_decodes_to_empty_list() {
    let (client, _transport) = scripted_client(&[
        LOGIN_ACCEPTED,
        "235 CHARACTER\n488|kanji|Name|pic.jpg||||1|F",
    ]);
    login(&client).await;

    let result = client.character(488, false).await.unwrap();
    assert_eq!(
        result.get("anime_blocks").and_then(FieldValue::as_str_list),
        Some(&[][..])
    );
    assert_eq!(
        result.get("episode_list").and_then(FieldValue::as_int_list),
        Some(&[][..])
    );
}

#[tokio::test]
async fn escaped_reply_content_is_unescaped() {
    let (client, _transport) = scripted_client(&[
        LOGIN_ACCEPTED,
        "233 ANIMEDESC\n0|1|Love &amp; War<br />a tale of Minori`s club",
    ]);
    login(&client).await;

    let result = client.anime_desc(1, 0, false).await.unwrap();
    assert_eq!(
        result.get("description").and_then(FieldValue::as_str),
        Some("Love & War\na tale of Minori's club")
    );
}

#[tokio::test]
async fn encoding_change_is_in_band() {
    let (client, transport) = scripted_client(&["219 ENCODING CHANGED"]);

    let result = client.encoding("UTF8").await.unwrap();
    assert_eq!(result.code, 219);
    assert_eq!(
        result.get("message").and_then(FieldValue::as_str),
        Some("ENCODING CHANGED")
    );
    assert_eq!(transport.sent()[0], "ENCODING name=UTF8");
}
