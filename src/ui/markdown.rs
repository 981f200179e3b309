// ui/markdown.rs

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Renders the small markdown subset the Game Master writes with: headings,
/// bullets, `**bold**` and `*italic*`.
pub fn render_markdown(text: &str, base: Style) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                let heading = trimmed.trim_start_matches('#').trim();
                let style = base
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                Line::from(inline_spans(heading, style))
            } else if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                let mut spans = vec![Span::styled("  • ", base.fg(Color::DarkGray))];
                spans.extend(inline_spans(item, base));
                Line::from(spans)
            } else {
                Line::from(inline_spans(line, base))
            }
        })
        .collect()
}

fn inline_spans(line: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, chunk) in line.split("**").enumerate() {
        let style = if i % 2 == 1 {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        };
        for (j, part) in chunk.split('*').enumerate() {
            if part.is_empty() {
                continue;
            }
            let style = if j % 2 == 1 {
                style.add_modifier(Modifier::ITALIC)
            } else {
                style
            };
            spans.push(Span::styled(part.to_string(), style));
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_and_italic_spans() {
        let lines = render_markdown("**壽司** lies *still*.", Style::default());
        assert_eq!(lines.len(), 1);
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "壽司");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[1].content, " lies ");
        assert_eq!(spans[2].content, "still");
        assert!(spans[2].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn headings_and_bullets() {
        let lines = render_markdown("## The classroom\n- a bloody knife", Style::default());
        assert_eq!(lines[0].spans[0].content, "The classroom");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(lines[1].spans[0].content, "  • ");
        assert_eq!(lines[1].spans[1].content, "a bloody knife");
    }
}
