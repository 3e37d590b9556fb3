use crate::config::Direction;
use crate::view::tree::generic::{GenericTree, TreeRow};
use crate::view::tree::icons::Switcher;
use crate::view::tree::node::Key;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Colors used by the tree renderer
#[derive(Debug, Clone, Copy)]
pub struct TreeTheme {
    pub switcher: Color,
    pub folder: Color,
    pub file: Color,
    pub title: Color,
    pub disabled: Color,
    pub selected_bg: Color,
    pub cursor_bg: Color,
    pub border_focused: Color,
}

impl Default for TreeTheme {
    fn default() -> Self {
        Self {
            switcher: Color::Yellow,
            folder: Color::Blue,
            file: Color::White,
            title: Color::White,
            disabled: Color::DarkGray,
            selected_bg: Color::Blue,
            cursor_bg: Color::DarkGray,
            border_focused: Color::Cyan,
        }
    }
}

pub struct TreeRenderer;

impl TreeRenderer {
    /// Render the tree in the given frame area
    ///
    /// Updates the viewport height of the tree core so scrolling follows the
    /// area actually drawn.
    pub fn render(
        tree: &mut GenericTree,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        is_focused: bool,
        theme: &TreeTheme,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .border_style(if is_focused {
                Style::default().fg(theme.border_focused)
            } else {
                Style::default()
            });
        let inner = block.inner(area);

        let rows = tree.rows();
        let core = tree.core_mut();
        core.set_viewport_height(inner.height as usize);
        core.clamp_scroll(rows.len());
        let cursor_index = core
            .cursor()
            .map(|cursor| rows.iter().position(|row| &row.node.key == cursor));
        match cursor_index {
            Some(Some(index)) => core.ensure_visible(index),
            // Cursor node was removed or collapsed away
            Some(None) => core.set_cursor(None),
            None => {}
        }
        let window = tree.core().visible_window(rows.len());
        let cursor = tree.core().cursor().cloned();

        let items: Vec<ListItem> = rows[window]
            .iter()
            .map(|row| {
                let is_cursor = is_focused && cursor.as_ref() == Some(&row.node.key);
                Self::render_row(tree, row, inner.width as usize, is_cursor, theme)
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    /// Key of the row under a terminal cell, for mouse handling
    pub fn hit_test(tree: &GenericTree, area: Rect, column: u16, row: u16) -> Option<Key> {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if column < inner.x
            || column >= inner.x + inner.width
            || row < inner.y
            || row >= inner.y + inner.height
        {
            return None;
        }

        let visible = tree.core().visible_order(tree.entities());
        let index = tree
            .core()
            .index_at_row((row - inner.y) as usize, visible.len())?;
        visible.get(index).cloned()
    }

    fn render_row(
        tree: &GenericTree,
        row: &TreeRow,
        width: usize,
        is_cursor: bool,
        theme: &TreeTheme,
    ) -> ListItem<'static> {
        let direction = tree.direction();
        let node = &row.node;
        let mut spans = Vec::new();

        if node.level > 0 {
            spans.push(Span::raw("  ".repeat(node.level)));
        }

        let switcher = row
            .switcher
            .as_ref()
            .map_or(" ", |switcher: &Switcher| switcher.glyph(node.expanded, direction));
        spans.push(Span::styled(
            pad(switcher, direction),
            Style::default().fg(theme.switcher),
        ));

        if row.checkbox.is_some() {
            let mark = if node.selected { "[x]" } else { "[ ]" };
            spans.push(Span::raw(pad(mark, direction)));
        }

        if let Some(icon) = &row.icon {
            let color = if node.is_leaf { theme.file } else { theme.folder };
            spans.push(Span::styled(
                pad(icon.glyph(node.expanded, direction), direction),
                Style::default().fg(color),
            ));
        }

        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let title = truncate_to_width(&row.title, width.saturating_sub(used));

        let mut title_style = Style::default().fg(if node.disabled {
            theme.disabled
        } else {
            theme.title
        });
        if node.selected && !tree.block_node() {
            title_style = title_style.bg(theme.selected_bg).add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(title, title_style));

        if direction == Direction::Rtl {
            spans.reverse();
        }
        let mut line = Line::from(spans);
        if direction == Direction::Rtl {
            line = line.alignment(Alignment::Right);
        }

        let mut lines = vec![line];
        lines.extend((1..tree.core().item_height()).map(|_| Line::default()));

        let mut item = ListItem::new(Text::from(lines));
        if is_cursor {
            item = item.style(Style::default().bg(theme.cursor_bg));
        } else if node.selected && tree.block_node() {
            item = item.style(Style::default().bg(theme.selected_bg));
        }
        item
    }
}

/// Separate a glyph from the title, on the side facing the title
fn pad(glyph: &str, direction: Direction) -> String {
    match direction {
        Direction::Ltr => format!("{glyph} "),
        Direction::Rtl => format!(" {glyph}"),
    }
}

/// Cut `text` to at most `max` display columns, ending with an ellipsis when cut
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::view::tree::icons::directory_icon;
    use crate::view::tree::node::{keys, TreeData, TreeNode};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn sample_tree(config: TreeConfig) -> GenericTree {
        let data = TreeData::new(vec![
            TreeNode::branch(
                "src",
                "src",
                vec![TreeNode::leaf("src/main.rs", "main.rs")],
            ),
            TreeNode::leaf("README.md", "README.md"),
        ]);
        GenericTree::new(config, data).with_icon(directory_icon)
    }

    fn draw(tree: &mut GenericTree, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                TreeRenderer::render(tree, frame, area, "files", true, &TreeTheme::default());
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_render_expanded_tree() {
        let config = TreeConfig {
            show_icon: Some(true),
            ..TreeConfig::default()
        };
        let mut tree = sample_tree(config);
        tree.toggle_expand(&Key::from("src"));

        let buffer = draw(&mut tree, 30, 6);
        assert!(row_text(&buffer, 0).contains("files"));
        assert!(row_text(&buffer, 1).contains("▼ ▣ src"));
        assert!(row_text(&buffer, 2).contains("    □ main.rs"));
        assert!(row_text(&buffer, 3).contains("  □ README.md"));
    }

    #[test]
    fn test_render_rtl_aligns_right() {
        let config = TreeConfig {
            direction: Direction::Rtl,
            ..TreeConfig::default()
        };
        let mut tree = sample_tree(config);

        let buffer = draw(&mut tree, 20, 4);
        let first = row_text(&buffer, 1);
        assert!(first.trim_end_matches('│').trim_end().ends_with("src ◀"));
    }

    #[test]
    fn test_viewport_follows_render_area() {
        let mut tree = sample_tree(TreeConfig::default());
        tree.toggle_expand(&Key::from("src"));
        tree.core_mut().set_cursor(Some(Key::from("README.md")));

        // Two inner rows: the cursor row must scroll into view
        let buffer = draw(&mut tree, 20, 4);
        assert_eq!(tree.core().items_per_page(), 2);
        assert_eq!(tree.core().get_scroll_offset(), 1);
        assert!(row_text(&buffer, 2).contains("README.md"));
    }

    fn long_tree(virtual_list: bool) -> GenericTree {
        let data = TreeData::new(
            (0..8)
                .map(|i| TreeNode::leaf(format!("f{i}").as_str(), format!("file{i}")))
                .collect(),
        );
        let config = TreeConfig {
            virtual_list,
            ..TreeConfig::default()
        };
        GenericTree::new(config, data)
    }

    #[test]
    fn test_shrunk_tree_is_not_drawn_blank() {
        let mut tree = long_tree(true);
        for _ in 0..8 {
            tree.cursor_next();
        }
        draw(&mut tree, 20, 5);
        assert_eq!(tree.core().get_scroll_offset(), 5);

        tree.set_data(TreeData::new(vec![
            TreeNode::leaf("alpha", "alpha"),
            TreeNode::leaf("beta", "beta"),
        ]));
        let buffer = draw(&mut tree, 20, 5);
        assert!(row_text(&buffer, 1).contains("alpha"));
        assert!(row_text(&buffer, 2).contains("beta"));
        assert_eq!(tree.core().get_scroll_offset(), 0);
        assert_eq!(tree.core().cursor(), None);
    }

    #[test]
    fn test_non_virtual_list_scrolls_to_cursor() {
        let mut tree = long_tree(false);
        for _ in 0..8 {
            tree.cursor_next();
        }
        assert_eq!(tree.core().cursor(), Some(&Key::from("f7")));

        let buffer = draw(&mut tree, 20, 5);
        assert!(row_text(&buffer, 3).contains("file7"));
        assert!(row_text(&buffer, 1).contains("file5"));
        let area = Rect::new(0, 0, 20, 5);
        assert_eq!(TreeRenderer::hit_test(&tree, area, 3, 3), Some(Key::from("f7")));
    }

    #[test]
    fn test_hit_test_maps_rows_to_keys() {
        let mut tree = sample_tree(TreeConfig::default());
        tree.toggle_expand(&Key::from("src"));
        let area = Rect::new(0, 0, 20, 6);
        draw(&mut tree, 20, 6);

        assert_eq!(TreeRenderer::hit_test(&tree, area, 3, 1), Some(Key::from("src")));
        assert_eq!(
            TreeRenderer::hit_test(&tree, area, 3, 2),
            Some(Key::from("src/main.rs"))
        );
        assert_eq!(TreeRenderer::hit_test(&tree, area, 3, 4), None);
        assert_eq!(TreeRenderer::hit_test(&tree, area, 0, 1), None);
    }

    #[test]
    fn test_checkbox_marks_selection() {
        let config = TreeConfig {
            checkable: true,
            ..TreeConfig::default()
        };
        let mut tree = sample_tree(config);
        tree.core_mut().set_selected_keys(keys(["README.md"]));

        let buffer = draw(&mut tree, 30, 4);
        assert!(row_text(&buffer, 1).contains("[ ] src"));
        assert!(row_text(&buffer, 2).contains("[x] README.md"));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a long name", 6), "a lon…");
        assert_eq!(truncate_to_width("日本語", 4), "日…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
