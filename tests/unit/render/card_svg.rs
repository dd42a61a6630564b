use super::*;
use crate::render::surface::{CaptureSurface, RasterizeOpts};

#[test]
fn escape_xml_covers_markup_characters() {
    assert_eq!(
        escape_xml(r#"<a & 'b' "c">"#),
        "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;"
    );
    assert_eq!(escape_xml("水瓶座"), "水瓶座");
}

#[test]
fn content_markup_carries_card_text() {
    let card = CardData::sample();
    let svg = content_svg(&UserInput::default(), &card);
    assert!(svg.contains("命理卡片"));
    assert!(svg.contains(&card.core_trait));
    assert!(svg.contains("A型血"));
    assert!(svg.contains("INTJ"));
    for sentence in card.fortune_sentences() {
        assert!(svg.contains(&sentence));
    }
}

#[test]
fn content_markup_escapes_generated_text() {
    let mut card = CardData::sample();
    card.core_trait = "<b>&</b>".to_string();
    let svg = content_svg(&UserInput::default(), &card);
    assert!(svg.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
    assert!(!svg.contains("<b>"));
}

#[test]
fn backdrop_is_lighter_with_video() {
    assert!(backdrop_svg(true).contains(r#"fill-opacity="0.5""#));
    assert!(backdrop_svg(false).contains(r#"fill-opacity="0.6""#));
}

#[test]
fn surface_layers_follow_poster_presence() {
    let renderer = CardRenderer::new(None);
    let input = UserInput::default();
    let card = CardData::sample();

    let plain = renderer.surface(&input, &card, None).unwrap();
    assert!(!plain.has_layer(LayerKind::BackgroundVideo));
    assert_eq!(plain.layers().len(), 2);

    let poster = Frame::transparent(Size::new(16, 9)).unwrap();
    let with_video = renderer.surface(&input, &card, Some(poster)).unwrap();
    assert!(with_video.has_layer(LayerKind::BackgroundVideo));
    assert_eq!(with_video.size(), CARD_SIZE);
}

#[test]
fn export_raster_is_twice_card_size() {
    let renderer = CardRenderer::new(None);
    let surface = renderer
        .surface(&UserInput::default(), &CardData::sample(), None)
        .unwrap();
    let frame = surface.rasterize(&RasterizeOpts::export()).unwrap();
    assert_eq!(frame.size(), Size::new(1100, 1376));
    // Backdrop covers the middle of the card.
    assert!(frame.pixel(550, 700).unwrap()[3] > 0);
}
