//! End-to-end slide deck mutation scenarios for the homepage editor.

use portal_service::handlers::content::{apply_slide_mutation, parse_index, SlideMutation};
use portal_service::models::HeroSlide;

fn slide(title: &str, image: &str) -> HeroSlide {
    HeroSlide {
        image: image.to_string(),
        title: title.to_string(),
        subtitle: String::new(),
        description: String::new(),
        cta_text: String::new(),
        cta_link: String::new(),
    }
}

#[test]
fn build_a_deck_from_scratch() {
    let mut deck = Vec::new();

    for (title, image) in [("Welcome", "img1"), ("Research", "img2"), ("Admissions", "img3")] {
        deck = apply_slide_mutation(
            deck,
            SlideMutation {
                new_image: Some(image.to_string()),
                title: title.to_string(),
                ..Default::default()
            },
        );
    }

    assert_eq!(deck.len(), 3);
    assert_eq!(deck[0].title, "Welcome");
    assert_eq!(deck[2].image, "img3");
}

#[test]
fn edit_middle_slide_then_delete_first() {
    let deck = vec![slide("a", "i1"), slide("b", "i2"), slide("c", "i3")];

    // Text-only edit keeps the image.
    let deck = apply_slide_mutation(
        deck,
        SlideMutation {
            edit_index: Some(1),
            title: "b-renamed".into(),
            description: "now described".into(),
            ..Default::default()
        },
    );
    assert_eq!(deck[1].title, "b-renamed");
    assert_eq!(deck[1].image, "i2");

    // Deleting the first slide shifts the rest left.
    let deck = apply_slide_mutation(
        deck,
        SlideMutation {
            delete_index: Some(0),
            ..Default::default()
        },
    );
    assert_eq!(deck.len(), 2);
    assert_eq!(deck[0].title, "b-renamed");
}

#[test]
fn replace_image_in_place() {
    let deck = vec![slide("a", "old")];
    let deck = apply_slide_mutation(
        deck,
        SlideMutation {
            edit_index: Some(0),
            new_image: Some("new".into()),
            title: "a".into(),
            ..Default::default()
        },
    );
    assert_eq!(deck.len(), 1);
    assert_eq!(deck[0].image, "new");
}

#[test]
fn delete_last_slide_leaves_empty_deck() {
    let deck = vec![slide("only", "img")];
    let deck = apply_slide_mutation(
        deck,
        SlideMutation {
            delete_index: Some(0),
            ..Default::default()
        },
    );
    assert!(deck.is_empty());
}

#[test]
fn frontend_index_junk_is_tolerated() {
    // The admin UI sends whatever the form state holds.
    for junk in [None, Some(""), Some("undefined"), Some("null"), Some("NaN")] {
        assert_eq!(parse_index(junk), None);
    }

    let deck = vec![slide("a", "i1")];
    let deck = apply_slide_mutation(
        deck,
        SlideMutation {
            delete_index: parse_index(Some("undefined")),
            edit_index: parse_index(Some("null")),
            title: "ignored".into(),
            ..Default::default()
        },
    );
    assert_eq!(deck.len(), 1);
    assert_eq!(deck[0].title, "a");
}
