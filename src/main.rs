use anyhow::{Context, Result as AnyhowResult};
use clap::{Parser, ValueEnum};
use crossterm::event::{
    poll as event_poll, read as event_read, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use dirtree::config::{DirectoryTreeConfig, ExpandAction, ShowLine};
use dirtree::input::Modifiers;
use dirtree::services::terminal_modes::{self, TerminalModes};
use dirtree::services::tracing_setup;
use dirtree::view::tree::{DirectoryTree, DirectoryTreeProps, Key, TreeData};
use dirtree::view::ui::{TreeRenderer, TreeTheme};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    io::{self, stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// Two clicks on the same row within this window form a double click
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Browse a directory as an interactive tree
#[derive(Parser, Debug)]
#[command(name = "dirtree")]
#[command(about = "Browse a directory as an interactive tree", long_about = None)]
#[command(version)]
struct Args {
    /// Directory to browse (default: current directory)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Path to a JSON tree configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Allow selecting several nodes with ctrl/shift
    #[arg(long)]
    multiple: bool,

    /// Gesture that toggles a folder
    #[arg(long, value_enum, value_name = "ACTION")]
    expand_action: Option<ExpandActionArg>,

    /// Draw connecting lines
    #[arg(long)]
    show_line: bool,

    /// How deep to read the directory
    #[arg(long, value_name = "N", default_value_t = 8)]
    max_depth: usize,

    /// Path to log file for diagnostics (default: user cache dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExpandActionArg {
    Click,
    DoubleClick,
}

impl From<ExpandActionArg> for ExpandAction {
    fn from(value: ExpandActionArg) -> Self {
        match value {
            ExpandActionArg::Click => ExpandAction::Click,
            ExpandActionArg::DoubleClick => ExpandAction::DoubleClick,
        }
    }
}

/// File config with command-line overrides applied
fn load_config(args: &Args) -> AnyhowResult<DirectoryTreeConfig> {
    let mut config = match &args.config {
        Some(path) => DirectoryTreeConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DirectoryTreeConfig::default(),
    };

    if args.multiple {
        config.tree.multiple = true;
    }
    if let Some(action) = args.expand_action {
        config.expand_action = action.into();
    }
    if args.show_line {
        config.tree.show_line = ShowLine::Enabled(true);
    }
    Ok(config)
}

fn default_log_path() -> PathBuf {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dirtree");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create log directory {}: {}", dir.display(), e);
        return std::env::temp_dir().join("dirtree.log");
    }
    dir.join("dirtree.log")
}

struct App {
    tree: DirectoryTree,
    title: String,
    theme: TreeTheme,
    /// Area of the last render, for mouse hit testing
    area: Rect,
    last_click: Option<(Key, Instant)>,
    should_quit: bool,
}

impl App {
    fn new(tree: DirectoryTree, root: &Path) -> Self {
        Self {
            tree,
            title: root.display().to_string(),
            theme: TreeTheme::default(),
            area: Rect::default(),
            last_click: None,
            should_quit: false,
        }
    }

    fn render(&mut self, frame: &mut ratatui::Frame) {
        self.area = frame.area();
        TreeRenderer::render(
            self.tree.tree_mut(),
            frame,
            self.area,
            &self.title,
            true,
            &self.theme,
        );
    }

    fn cursor_key(&self) -> Option<Key> {
        self.tree.tree().core().cursor().cloned()
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.kind != KeyEventKind::Press {
            return;
        }
        let modifiers = Modifiers::from(event.modifiers);

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down => self.tree.tree_mut().cursor_next(),
            KeyCode::Up => self.tree.tree_mut().cursor_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(key) = self.cursor_key() {
                    self.tree.click(&key, modifiers);
                }
            }
            KeyCode::Right | KeyCode::Left => {
                let Some(key) = self.cursor_key() else {
                    return;
                };
                let expanded = self.tree.tree().core().is_expanded(&key);
                if expanded == (event.code == KeyCode::Left) {
                    self.tree.expand(&key);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(key) = TreeRenderer::hit_test(self.tree.tree(), self.area, event.column, event.row)
        else {
            return;
        };
        let modifiers = Modifiers::from(event.modifiers);

        self.tree.click(&key, modifiers);
        let now = Instant::now();
        let is_double = matches!(
            &self.last_click,
            Some((last, at)) if *last == key && now.duration_since(*at) < DOUBLE_CLICK_WINDOW
        );
        if is_double {
            self.tree.double_click(&key, modifiers);
            self.last_click = None;
        } else {
            self.last_click = Some((key, now));
        }
    }
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    let mut needs_render = true;

    while !app.should_quit {
        if needs_render {
            terminal.draw(|frame| app.render(frame))?;
            needs_render = false;
        }

        if !event_poll(Duration::from_millis(250))? {
            continue;
        }
        match event_read()? {
            CrosstermEvent::Key(key_event) => app.handle_key(key_event),
            CrosstermEvent::Mouse(mouse_event) => app.handle_mouse(mouse_event),
            CrosstermEvent::Resize(..) => {}
            _ => continue,
        }
        needs_render = true;
    }
    Ok(())
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Handle --dump-config early (no terminal setup needed)
    if args.dump_config {
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let log_file = args.log_file.clone().unwrap_or_else(default_log_path);
    tracing_setup::init_global(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    tracing::info!("dirtree starting");

    let root = match &args.path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let data = TreeData::from_dir(&root, args.max_depth)
        .with_context(|| format!("Failed to read directory {}", root.display()))?;

    let tree = DirectoryTree::new(DirectoryTreeProps::new(data).with_config(config))
        .on_select(|keys, info| {
            tracing::info!("selected {:?} via {} ({:?})", keys, info.node, info.mode);
        })
        .on_expand(|keys, info| {
            tracing::info!("{} expanded={} ({} open)", info.node, info.expanded, keys.len());
        });
    let mut app = App::new(tree, &root);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let terminal_modes = TerminalModes::enable()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let result = run_event_loop(&mut app, &mut terminal);
    drop(terminal_modes);
    result?;

    for key in app.tree.selected_keys() {
        println!("{}", key);
    }
    tracing::info!("dirtree exiting");
    Ok(())
}
