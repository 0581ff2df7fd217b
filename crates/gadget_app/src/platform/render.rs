//! Static HTML rendering of the gadget view model.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use gadget_core::{
    escape_html, Carousel, EntryView, GadgetViewModel, MessageBundle, SectionBody, SectionView,
};

pub fn render_page(view: &GadgetViewModel, messages: &MessageBundle, generated: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&view.title));
    if let Some(css) = &view.css_url {
        let _ = writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", escape_html(css));
    }
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(
        out,
        "<div class=\"gadget\"{}>",
        display_style(view.visible)
    );
    render_header(&mut out, view, messages);
    for section in &view.sections {
        render_section(&mut out, section, messages);
    }
    if let Some(url) = &view.add_button_url {
        let _ = writeln!(
            out,
            "<div class=\"add-button\"><a href=\"{}\" target=\"_top\">{}</a></div>",
            escape_html(url),
            escape_html(messages.get("add"))
        );
    }
    out.push_str("</div>\n");
    let _ = writeln!(out, "<!-- generated {} -->", generated.to_rfc3339());
    out.push_str("</body>\n</html>\n");
    out
}

fn render_header(out: &mut String, view: &GadgetViewModel, messages: &MessageBundle) {
    out.push_str("<div class=\"header\">");
    let _ = write!(out, "<span class=\"title\">{}</span>", escape_html(&view.title));
    if let Some(url) = &view.subscribe_url {
        let _ = write!(
            out,
            " <a class=\"subscribe\" href=\"{}\" target=\"_top\">{}</a>",
            escape_html(url),
            escape_html(messages.get("subscribe"))
        );
    }
    out.push_str("</div>\n");
}

fn render_section(out: &mut String, section: &SectionView, messages: &MessageBundle) {
    let _ = writeln!(out, "<div class=\"section\" id=\"section-{}\">", section.id);
    if section.subheader_visible {
        out.push_str("<div class=\"subheader\">");
        let _ = write!(out, "<span class=\"title\">{}</span>", escape_html(&section.title));
        if let Some(url) = &section.subscribe_url {
            let _ = write!(
                out,
                " <a class=\"subscribe\" href=\"{}\" target=\"_top\">{}</a>",
                escape_html(url),
                escape_html(messages.get("subscribe"))
            );
        }
        out.push_str("</div>\n");
    }

    let _ = writeln!(out, "<div class=\"body\"{}>", display_style(section.expanded));
    if section.loading {
        let _ = writeln!(
            out,
            "<div class=\"loading\">{}</div>",
            escape_html(messages.get("loading"))
        );
    }
    match &section.body {
        SectionBody::Raw { html, .. } | SectionBody::Custom { html } => {
            out.push_str(html);
            out.push('\n');
        }
        SectionBody::Feed { entries } => {
            for entry in entries {
                render_entry(out, entry, messages);
            }
            if let Some(url) = &section.read_more_url {
                let _ = writeln!(
                    out,
                    "<a class=\"read-more\" href=\"{}\" target=\"_top\">{}</a>",
                    escape_html(url),
                    escape_html(messages.get("read.more"))
                );
            }
        }
        SectionBody::Featured(carousel) => render_carousel(out, carousel, messages),
    }
    out.push_str("</div>\n</div>\n");
}

fn render_entry(out: &mut String, entry: &EntryView, messages: &MessageBundle) {
    match entry {
        EntryView::Item(item) => {
            out.push_str("<div class=\"entry\">");
            if item.title_url.is_empty() {
                let _ = write!(out, "<span class=\"entry-title\">{}</span>", escape_html(&item.title_text));
            } else {
                let _ = write!(
                    out,
                    "<a class=\"entry-title\" href=\"{}\" target=\"_top\">{}</a>",
                    escape_html(&item.title_url),
                    escape_html(&item.title_text)
                );
            }
            if !item.byline.is_empty() {
                let _ = write!(out, "<div class=\"byline\">{}</div>", escape_html(&item.byline));
            }
            let _ = write!(out, "<div class=\"snippet\">{}</div>", item.snippet_html);
            out.push_str("</div>\n");
        }
        EntryView::LoadError => {
            let _ = writeln!(
                out,
                "<div class=\"entry error\">{}</div>",
                escape_html(messages.get("error.loading"))
            );
        }
    }
}

fn render_carousel(out: &mut String, carousel: &Carousel, messages: &MessageBundle) {
    let class = if carousel.minimal {
        "featured minimal"
    } else {
        "featured"
    };
    let _ = writeln!(out, "<div class=\"{class}\">");
    if let Some(error) = &carousel.error {
        let _ = writeln!(out, "<div class=\"error\">{}</div>", escape_html(error));
    } else if let Some(feature) = carousel.features.get(carousel.current) {
        let _ = writeln!(out, "<div class=\"feature\">{feature}</div>");
        if !carousel.minimal && carousel.features.len() > 1 {
            let _ = writeln!(
                out,
                "<div class=\"nav\"><span class=\"previous\">{}</span> {} / {} <span class=\"next\">{}</span></div>",
                escape_html(messages.get("previous")),
                carousel.current + 1,
                carousel.features.len(),
                escape_html(messages.get("next"))
            );
        }
    }
    out.push_str("</div>\n");
}

fn display_style(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " style=\"display:none\""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gadget_core::{update, GadgetConfig, GadgetState, Msg};

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn static_gadget_renders_visible_sections() {
        let config = GadgetConfig {
            css_url: Some("http://cdn/g.css".into()),
            show_add_button: true,
            prod_gadget_url: "http://g/x.xml".into(),
            ..GadgetConfig::with_feeds(["html:Notes:<p>hi</p>", "html:More:<p>there</p>"])
        };
        let (state, _effects) = update(GadgetState::new(config), Msg::Render { seed: 0 });
        let html = render_page(&state.view(), state.messages(), generated());

        assert!(html.contains("<link rel=\"stylesheet\" href=\"http://cdn/g.css\">"));
        assert!(html.contains("<div class=\"gadget\">"));
        assert!(html.contains("<span class=\"title\">Notes</span>"));
        assert!(html.contains("<div class=\"body\">\n<p>hi</p>"));
        assert!(html.contains("<div class=\"body\" style=\"display:none\">\n<p>there</p>"));
        assert!(html.contains("class=\"add-button\""));
        assert!(html.contains("2024-01-02T03:04:05+00:00"));
    }

    #[test]
    fn pending_feed_renders_hidden_gadget_with_loading_marker() {
        let config = GadgetConfig::with_feeds(["News:http://news/rss", "Other:http://other/rss"]);
        let (state, _effects) = update(GadgetState::new(config), Msg::Render { seed: 0 });
        let html = render_page(&state.view(), state.messages(), generated());

        assert!(html.contains("<div class=\"gadget\" style=\"display:none\">"));
        assert!(html.contains("<div class=\"loading\">loading...</div>"));
        assert!(!html.contains("add-button"));
    }
}
