//! Card markup: the backdrop and content layers as SVG, parsed with a shared font database.

use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::{Frame, Size};
use crate::foundation::error::{CardError, CardResult};
use crate::model::card::{CardData, TraitSection, UserInput};
use crate::model::category::Rgb;
use crate::render::surface::{CardSurface, Layer, LayerKind, LayerSource};

/// Logical card size (4:5).
pub const CARD_SIZE: Size = Size::new(550, 688);

const FONT_STACK: &str =
    "Noto Sans CJK SC, Source Han Sans SC, PingFang SC, Microsoft YaHei, sans-serif";
const TITLE: &str = "命理卡片";

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn svg_open(size: Size) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.width,
        h = size.height
    )
}

/// Dimmed panel drawn between the video and the content.
pub fn backdrop_svg(with_video: bool) -> String {
    let opacity = if with_video { 0.5 } else { 0.6 };
    let Size { width, height } = CARD_SIZE;
    format!(
        r##"{open}<rect x="0" y="0" width="{width}" height="{height}" rx="24" fill="#0f172a" fill-opacity="{opacity}"/><rect x="0.5" y="0.5" width="{w1}" height="{h1}" rx="24" fill="none" stroke="#ffffff" stroke-opacity="0.1"/></svg>"##,
        open = svg_open(CARD_SIZE),
        w1 = width - 1,
        h1 = height - 1,
    )
}

fn text(x: f32, y: f32, size: u32, weight: u32, fill: &str, opacity: f32, body: &str) -> String {
    format!(
        r#"<text x="{x}" y="{y}" font-family="{FONT_STACK}" font-size="{size}" font-weight="{weight}" fill="{fill}" fill-opacity="{opacity}" text-anchor="middle">{}</text>"#,
        escape_xml(body)
    )
}

fn section(x: f32, top: f32, title: &str, traits: &[String], color: &str) -> String {
    let mut s = text(x, top, 24, 900, color, 1.0, title);
    s.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-opacity="0.2" stroke-width="2"/>"#,
        x - 40.0,
        top + 10.0,
        x + 40.0,
        top + 10.0
    ));
    for (i, t) in traits.iter().enumerate() {
        s.push_str(&text(x, top + 34.0 + 20.0 * i as f32, 14, 500, color, 0.7, t));
    }
    s
}

fn icon_row(input: &UserInput) -> String {
    let y = 130.0;
    let (from, to) = input.zodiac.element().gradient();
    let badge = hex(input.mbti.temperament().badge_color());
    let mut s = format!(
        r##"<defs><linearGradient id="zodiac" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs><rect x="179" y="{}" width="192" height="2" fill="#a5b4fc" fill-opacity="0.3"/>"##,
        hex(from),
        hex(to),
        y - 1.0
    );
    s.push_str(&format!(
        r#"<rect x="166" y="{}" width="44" height="44" rx="12" fill="url(#zodiac)"/>"#,
        y - 22.0
    ));
    s.push_str(&text(188.0, y + 9.0, 24, 400, "#ffffff", 1.0, &input.zodiac.glyph().to_string()));
    s.push_str(&format!(
        r#"<rect x="226" y="{}" width="48" height="32" rx="4" fill="{badge}"/>"#,
        y - 16.0
    ));
    s.push_str(&text(250.0, y + 4.0, 10, 700, "#ffffff", 1.0, input.mbti.code()));
    s.push_str(&text(312.0, y + 11.0, 30, 400, "#ffffff", 1.0, input.animal.emoji()));
    s.push_str(&format!(
        r##"<rect x="346" y="{}" width="36" height="36" rx="4" fill="#f43f5e"/>"##,
        y - 18.0
    ));
    s.push_str(&text(364.0, y + 6.0, 18, 700, "#ffffff", 1.0, input.blood_type.letter()));
    s
}

fn trait_titles<'a>(card: &'a CardData, input: &UserInput) -> [(&'a TraitSection, String); 4] {
    [
        (&card.zodiac, card.zodiac.title.clone()),
        (&card.mbti, card.mbti.title.clone()),
        (&card.animal, card.animal.title.clone()),
        (&card.blood_type, input.blood_type.section_title()),
    ]
}

/// Title, icon row, trait grid, core trait and fortune.
pub fn content_svg(input: &UserInput, card: &CardData) -> String {
    let cx = (CARD_SIZE.width / 2) as f32;
    let mut s = svg_open(CARD_SIZE);
    s.push_str(&text(cx, 78.0, 36, 900, "#ffffff", 1.0, TITLE));
    s.push_str(&icon_row(input));

    let center_y = 345.0;
    s.push_str(&format!(
        r##"<circle cx="{cx}" cy="{center_y}" r="72" fill="#020617" fill-opacity="0.8"/><circle cx="{cx}" cy="{center_y}" r="70" fill="none" stroke="#fde68a" stroke-opacity="0.2" stroke-width="1.5" stroke-dasharray="4 4"/>"##
    ));
    s.push_str(&text(cx, center_y - 40.0, 10, 500, "#fef3c7", 0.4, "CORE TRAIT"));

    let colors = ["#e0f2fe", "#f3e8ff", "#fef3c7", "#ffe4e6"];
    let slots = [(150.0, 200.0), (400.0, 200.0), (150.0, 410.0), (400.0, 410.0)];
    for (((sec, title), color), (x, top)) in trait_titles(card, input)
        .into_iter()
        .zip(colors)
        .zip(slots)
    {
        s.push_str(&section(x, top, &title, &sec.traits, color));
    }
    s.push_str(&text(cx, center_y + 6.0, 18, 700, "#ffffff", 1.0, &card.core_trait));

    s.push_str(
        r##"<path d="M75,560 Q275,540 475,560" fill="none" stroke="#ffffff" stroke-opacity="0.3" stroke-width="1.5"/>"##,
    );
    s.push_str(&text(cx, 585.0, 14, 700, "#fef9c3", 1.0, "✦ 运势解读"));
    for (i, sentence) in card.fortune_sentences().iter().enumerate() {
        s.push_str(&text(cx, 606.0 + 16.0 * i as f32, 11, 300, "#e2e8f0", 0.95, sentence));
    }
    s.push_str("</svg>");
    s
}

/// Builds card surfaces. Holds the font database so it is loaded once per process.
#[derive(Clone)]
pub struct CardRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for CardRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardRenderer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl CardRenderer {
    pub fn new(fonts_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = fonts_dir {
            db.load_fonts_dir(dir);
        }
        tracing::debug!(faces = db.len(), "font database ready");
        Self {
            fontdb: Arc::new(db),
        }
    }

    pub fn parse(&self, markup: &str) -> CardResult<Arc<usvg::Tree>> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        usvg::Tree::from_str(markup, &opts)
            .map(Arc::new)
            .map_err(|e| CardError::raster(format!("parse card markup: {e}")))
    }

    /// Card surface for `card`, with `poster` as the background video layer when present.
    pub fn surface(
        &self,
        input: &UserInput,
        card: &CardData,
        poster: Option<Frame>,
    ) -> CardResult<CardSurface> {
        let mut surface = CardSurface::new(CARD_SIZE);
        let with_video = poster.is_some();
        if let Some(frame) = poster {
            surface.push(Layer::new(
                LayerKind::BackgroundVideo,
                LayerSource::Pixels(frame),
            ));
        }
        surface.push(Layer::new(
            LayerKind::Backdrop,
            LayerSource::Svg(self.parse(&backdrop_svg(with_video))?),
        ));
        surface.push(Layer::new(
            LayerKind::Content,
            LayerSource::Svg(self.parse(&content_svg(input, card))?),
        ));
        Ok(surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/card_svg.rs"]
mod tests;
