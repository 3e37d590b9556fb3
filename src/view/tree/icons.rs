//! Icons drawn in front of tree nodes
//!
//! The switcher (expand/collapse affordance) is chosen by an ordered decision
//! table: loading > leaf > custom > line-mode > default. The first rule that
//! applies decides, including deciding that nothing is drawn.

use crate::config::{Direction, ShowLine};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    Loading,
    File,
    Folder,
    FolderOpen,
    MinusSquare,
    PlusSquare,
    CaretDown,
    /// Arbitrary text supplied by the caller
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Icon {
    pub kind: IconKind,
    #[serde(default, rename = "className", skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

impl Icon {
    pub fn new(kind: IconKind) -> Self {
        Self {
            kind,
            classes: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(IconKind::Text(text.into()))
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Terminal glyph for this icon
    ///
    /// The caret points at the content when collapsed, mirrored for RTL.
    pub fn glyph(&self, expanded: bool, direction: Direction) -> &str {
        match &self.kind {
            IconKind::Loading => "⟳",
            IconKind::File => "□",
            IconKind::Folder => "■",
            IconKind::FolderOpen => "▣",
            IconKind::MinusSquare => "⊟",
            IconKind::PlusSquare => "⊞",
            IconKind::CaretDown if expanded => "▼",
            IconKind::CaretDown => match direction {
                Direction::Ltr => "▶",
                Direction::Rtl => "◀",
            },
            IconKind::Text(text) => text,
        }
    }
}

/// What sits in the switcher slot of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Switcher {
    Icon(Icon),
    /// Line connector without an icon, for leaves in line mode
    LeafLine { class: String },
}

impl Switcher {
    pub fn glyph(&self, expanded: bool, direction: Direction) -> &str {
        match self {
            Switcher::Icon(icon) => icon.glyph(expanded, direction),
            Switcher::LeafLine { .. } => "─",
        }
    }
}

/// Per-node state the switcher depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitcherState {
    pub is_leaf: bool,
    pub expanded: bool,
    pub loading: bool,
}

/// Inputs to the switcher decision table
#[derive(Debug, Clone, Copy)]
pub struct SwitcherContext<'a> {
    pub prefix_cls: &'a str,
    pub custom: Option<&'a Icon>,
    pub show_line: ShowLine,
    pub node: SwitcherState,
}

/// A rule returns None when it does not apply, or Some(decision)
type SwitcherRule = fn(&SwitcherContext<'_>) -> Option<Option<Switcher>>;

const SWITCHER_RULES: [(&str, SwitcherRule); 5] = [
    ("loading", loading_rule),
    ("leaf", leaf_rule),
    ("custom", custom_rule),
    ("line", line_rule),
    ("default", default_rule),
];

fn loading_rule(ctx: &SwitcherContext<'_>) -> Option<Option<Switcher>> {
    ctx.node.loading.then(|| {
        Some(Switcher::Icon(
            Icon::new(IconKind::Loading).with_class(format!("{}-switcher-loading-icon", ctx.prefix_cls)),
        ))
    })
}

fn leaf_rule(ctx: &SwitcherContext<'_>) -> Option<Option<Switcher>> {
    if !ctx.node.is_leaf {
        return None;
    }
    let decision = if !ctx.show_line.is_enabled() {
        None
    } else if ctx.show_line.show_leaf_icon() {
        Some(Switcher::Icon(
            Icon::new(IconKind::File).with_class(format!("{}-switcher-line-icon", ctx.prefix_cls)),
        ))
    } else {
        Some(Switcher::LeafLine {
            class: format!("{}-switcher-leaf-line", ctx.prefix_cls),
        })
    };
    Some(decision)
}

fn custom_rule(ctx: &SwitcherContext<'_>) -> Option<Option<Switcher>> {
    let custom = ctx.custom?;
    let class = format!("{}-switcher-icon", ctx.prefix_cls);
    let icon = if custom.has_class(&class) {
        custom.clone()
    } else {
        custom.clone().with_class(class)
    };
    Some(Some(Switcher::Icon(icon)))
}

fn line_rule(ctx: &SwitcherContext<'_>) -> Option<Option<Switcher>> {
    if !ctx.show_line.is_enabled() {
        return None;
    }
    let kind = if ctx.node.expanded {
        IconKind::MinusSquare
    } else {
        IconKind::PlusSquare
    };
    Some(Some(Switcher::Icon(
        Icon::new(kind).with_class(format!("{}-switcher-line-icon", ctx.prefix_cls)),
    )))
}

fn default_rule(ctx: &SwitcherContext<'_>) -> Option<Option<Switcher>> {
    Some(Some(Switcher::Icon(
        Icon::new(IconKind::CaretDown).with_class(format!("{}-switcher-icon", ctx.prefix_cls)),
    )))
}

fn decide(ctx: &SwitcherContext<'_>) -> (&'static str, Option<Switcher>) {
    SWITCHER_RULES
        .iter()
        .find_map(|(name, rule)| rule(ctx).map(|decision| (*name, decision)))
        // The default rule always applies
        .unwrap_or(("default", None))
}

/// Pick the switcher for a node
pub fn switcher_icon(ctx: &SwitcherContext<'_>) -> Option<Switcher> {
    decide(ctx).1
}

/// Folder/file icon of a directory tree node
pub fn directory_icon(is_leaf: bool, expanded: bool) -> Icon {
    if is_leaf {
        Icon::new(IconKind::File)
    } else if expanded {
        Icon::new(IconKind::FolderOpen)
    } else {
        Icon::new(IconKind::Folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(custom: Option<&'a Icon>, show_line: ShowLine, node: SwitcherState) -> SwitcherContext<'a> {
        SwitcherContext {
            prefix_cls: "nsc-tree",
            custom,
            show_line,
            node,
        }
    }

    fn icon_of(switcher: Option<Switcher>) -> Icon {
        match switcher {
            Some(Switcher::Icon(icon)) => icon,
            other => panic!("expected an icon, got {:?}", other),
        }
    }

    #[test]
    fn test_loading_beats_everything() {
        let custom = Icon::text("+");
        let node = SwitcherState {
            is_leaf: true,
            expanded: true,
            loading: true,
        };
        let c = ctx(Some(&custom), ShowLine::Enabled(true), node);
        assert_eq!(decide(&c).0, "loading");
        let icon = icon_of(switcher_icon(&c));
        assert_eq!(icon.kind, IconKind::Loading);
        assert!(icon.has_class("nsc-tree-switcher-loading-icon"));
    }

    #[test]
    fn test_leaf_without_line_has_no_switcher() {
        let custom = Icon::text("+");
        let leaf = SwitcherState {
            is_leaf: true,
            ..Default::default()
        };
        // Leaf wins over a custom icon, and decides "nothing"
        let c = ctx(Some(&custom), ShowLine::Enabled(false), leaf);
        assert_eq!(decide(&c).0, "leaf");
        assert_eq!(switcher_icon(&c), None);
    }

    #[test]
    fn test_leaf_in_line_mode() {
        let leaf = SwitcherState {
            is_leaf: true,
            ..Default::default()
        };
        let icon = icon_of(switcher_icon(&ctx(None, ShowLine::Enabled(true), leaf)));
        assert_eq!(icon.kind, IconKind::File);
        assert!(icon.has_class("nsc-tree-switcher-line-icon"));

        let hidden = switcher_icon(&ctx(None, ShowLine::WithOptions { show_leaf_icon: false }, leaf));
        assert_eq!(
            hidden,
            Some(Switcher::LeafLine {
                class: "nsc-tree-switcher-leaf-line".to_string()
            })
        );

        let shown = icon_of(switcher_icon(&ctx(None, ShowLine::WithOptions { show_leaf_icon: true }, leaf)));
        assert_eq!(shown.kind, IconKind::File);
    }

    #[test]
    fn test_custom_icon_gets_switcher_class() {
        let custom = Icon::text("»").with_class("mine");
        let c = ctx(Some(&custom), ShowLine::Enabled(true), SwitcherState::default());
        assert_eq!(decide(&c).0, "custom");
        let icon = icon_of(switcher_icon(&c));
        assert_eq!(icon.classes, vec!["mine", "nsc-tree-switcher-icon"]);
    }

    #[test]
    fn test_line_mode_square_glyphs() {
        let expanded = SwitcherState {
            expanded: true,
            ..Default::default()
        };
        let c = ctx(None, ShowLine::Enabled(true), expanded);
        assert_eq!(decide(&c).0, "line");
        assert_eq!(icon_of(switcher_icon(&c)).kind, IconKind::MinusSquare);

        let collapsed = ctx(None, ShowLine::Enabled(true), SwitcherState::default());
        assert_eq!(icon_of(switcher_icon(&collapsed)).kind, IconKind::PlusSquare);
    }

    #[test]
    fn test_default_caret() {
        let c = ctx(None, ShowLine::Enabled(false), SwitcherState::default());
        assert_eq!(decide(&c).0, "default");
        let icon = icon_of(switcher_icon(&c));
        assert_eq!(icon.kind, IconKind::CaretDown);
        assert!(icon.has_class("nsc-tree-switcher-icon"));
        assert_eq!(icon.glyph(false, Direction::Ltr), "▶");
        assert_eq!(icon.glyph(false, Direction::Rtl), "◀");
        assert_eq!(icon.glyph(true, Direction::Rtl), "▼");
    }

    #[test]
    fn test_directory_icons() {
        assert_eq!(directory_icon(true, true).kind, IconKind::File);
        assert_eq!(directory_icon(false, true).kind, IconKind::FolderOpen);
        assert_eq!(directory_icon(false, false).kind, IconKind::Folder);
    }
}
