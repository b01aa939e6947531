//! HTML serialization of a `PreviewLayout`.
//!
//! Output is a standalone page sized to A4 at 96 dpi so the same markup can be
//! shown in the browser and captured by the rasterizer.

use std::fmt::Write;

use crate::render::preview::{PreviewLayout, SectionBlock, SectionBody};
use crate::render::templates::HeaderAlign;

/// A4 width in CSS pixels (210 mm at 96 dpi).
pub const PAGE_WIDTH_PX: u32 = 794;

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(layout: &PreviewLayout) -> String {
    let theme = &layout.theme;
    let align = match theme.header_align {
        HeaderAlign::Left => "left",
        HeaderAlign::Center => "center",
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    // `write!` into a String cannot fail.
    let _ = write!(
        html,
        "<style>\
         body{{margin:0;background:#fff;}}\
         .page{{width:{PAGE_WIDTH_PX}px;box-sizing:border-box;padding:48px;font-family:{font};color:#111827;}}\
         header{{text-align:{align};border-bottom:2px solid {accent};padding-bottom:16px;margin-bottom:24px;}}\
         h1{{margin:0;font-size:28px;}}\
         h2{{color:{accent};font-size:17px;margin:0 0 10px;}}\
         .title{{font-size:17px;color:#4b5563;}}\
         .contacts span{{margin-right:14px;font-size:13px;color:#6b7280;}}\
         .photo{{width:96px;height:96px;border-radius:50%;object-fit:cover;}}\
         .columns{{display:flex;gap:32px;}}\
         .main{{flex:1;}}\
         .side{{width:210px;}}\
         section{{margin-bottom:22px;}}\
         .entry{{margin-bottom:12px;}}\
         .entry-head{{display:flex;justify-content:space-between;font-weight:600;}}\
         .period{{font-weight:400;font-size:13px;color:#6b7280;}}\
         .sub{{color:#4b5563;}}\
         .chip{{display:inline-block;background:#f3f4f6;border-radius:999px;padding:3px 12px;margin:0 6px 6px 0;font-size:13px;}}\
         </style></head><body><div class=\"page template-{id}\">",
        font = theme.font_stack,
        accent = theme.accent,
        id = layout.template.id(),
    );

    html.push_str("<header>");
    if let Some(photo) = &layout.header.photo {
        let _ = write!(
            html,
            "<img class=\"photo\" src=\"{}\" alt=\"\">",
            escape_html(photo)
        );
    }
    let _ = write!(
        html,
        "<h1>{}</h1><div class=\"title\">{}</div><div class=\"contacts\">",
        escape_html(&layout.header.name),
        escape_html(&layout.header.professional_title)
    );
    for contact in &layout.header.contacts {
        let _ = write!(html, "<span>{}</span>", escape_html(contact));
    }
    html.push_str("</div></header>");

    if layout.side.is_empty() {
        push_sections(&mut html, &layout.main);
    } else {
        html.push_str("<div class=\"columns\"><div class=\"main\">");
        push_sections(&mut html, &layout.main);
        html.push_str("</div><aside class=\"side\">");
        push_sections(&mut html, &layout.side);
        html.push_str("</aside></div>");
    }

    html.push_str("</div></body></html>\n");
    html
}

fn push_sections(html: &mut String, sections: &[SectionBlock]) {
    for section in sections {
        let _ = write!(html, "<section><h2>{}</h2>", escape_html(section.heading));
        match &section.body {
            SectionBody::Paragraph(text) => {
                let _ = write!(html, "<p>{}</p>", escape_html(text));
            }
            SectionBody::Entries(entries) => {
                for entry in entries {
                    let _ = write!(
                        html,
                        "<div class=\"entry\"><div class=\"entry-head\"><span>{}</span>\
                         <span class=\"period\">{}</span></div><div class=\"sub\">{}</div>",
                        escape_html(&entry.heading),
                        escape_html(&entry.period),
                        escape_html(&entry.subheading)
                    );
                    if let Some(description) = &entry.description {
                        let _ = write!(html, "<p>{}</p>", escape_html(description));
                    }
                    html.push_str("</div>");
                }
            }
            SectionBody::Chips(items) => {
                for item in items {
                    let _ = write!(html, "<span class=\"chip\">{}</span>", escape_html(item));
                }
            }
            SectionBody::Bullets(items) => {
                html.push_str("<ul>");
                for item in items {
                    let _ = write!(html, "<li>{}</li>", escape_html(item));
                }
                html.push_str("</ul>");
            }
        }
        html.push_str("</section>");
    }
}
