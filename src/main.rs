use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Tabs};

use eodlog::app::{App, AppScreen, Overlay, StatusKind};
use eodlog::catalog::{Catalog, DEFAULT_CATALOG};
use eodlog::clipboard::SystemClipboard;
use eodlog::clock::LocalClock;
use eodlog::config::Config;
use eodlog::event::{AppEvent, EventHandler};
use eodlog::logging;
use eodlog::ui::components::entry_card::EntryCard;
use eodlog::ui::components::popup::{ConfirmReset, Prompt, RepPicker};
use eodlog::ui::components::summary_view::SummaryView;
use eodlog::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use eodlog::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "eodlog", version, about = "End-of-day sales logger with copyable summaries")]
struct Cli {
    #[arg(short, long, help = "Catalog profile name (e.g. standard, extended)")]
    catalog: Option<String>,

    #[arg(long, help = "Load the catalog from this TOML file instead of a profile")]
    catalog_file: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "List bundled catalog profiles and exit")]
    list_catalogs: bool,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,

    #[arg(long, help = "Write the current settings to the config file and exit")]
    init_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_catalogs {
        for name in Catalog::available_profiles() {
            println!("{name}");
        }
        return Ok(());
    }
    if cli.list_themes {
        let mut themes = Theme::available_themes();
        themes.sort();
        for name in themes {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_default();
    if let Some(catalog) = cli.catalog {
        config.catalog = catalog;
        config.catalog_file = None;
    }
    if let Some(path) = cli.catalog_file {
        config.catalog_file = Some(path);
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    if cli.init_config {
        config.save()?;
        println!("Wrote {}", Config::config_path().display());
        return Ok(());
    }

    let _log_guard = logging::init_or_disable(&config.log_level);

    let catalog = Arc::new(load_catalog(&config)?);
    tracing::info!(catalog = %catalog.name, version = catalog.version, "starting");

    let theme: &'static Theme = Box::leak(Box::new(Theme::load(&config.theme).unwrap_or_default()));
    let mut app = App::new(
        config,
        catalog,
        theme,
        Box::new(LocalClock),
        Box::new(SystemClipboard::system()),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// An explicit catalog file must load; a missing profile name falls back to
/// the bundled default.
fn load_catalog(config: &Config) -> Result<Catalog> {
    if let Some(path) = &config.catalog_file {
        return Catalog::from_path(path)
            .with_context(|| format!("loading catalog file {}", path.display()));
    }
    match Catalog::load(&config.catalog) {
        Ok(catalog) => Ok(catalog),
        Err(e) => {
            tracing::warn!(profile = %config.catalog, error = %e, "falling back to default catalog");
            Ok(Catalog::bundled(DEFAULT_CATALOG)?)
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Paste(text) => app.handle_paste(&text),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            tracing::info!("quit");
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hints: &[&str] = match app.screen() {
        AppScreen::Editing => &[
            "[j/k] Move",
            "[h/l or -/+] Count",
            "[Enter] Select",
            "[Tab] Next rep",
            "[a] Add Rep",
            "[d] Display",
            "[X] Clear All",
            "[q] Quit",
        ],
        AppScreen::Displaying => &[
            "[c] Copy",
            "[b/Esc] Back",
            "[j/k] Scroll",
            "[X] Clear All",
            "[q] Quit",
        ],
    };
    let hint_lines = pack_hint_lines(hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16 + 1);

    render_header(frame, app, layout.header);

    match app.screen() {
        AppScreen::Editing => render_editing(frame, app, &layout),
        AppScreen::Displaying => {
            let summary = app.session.summary().unwrap_or_default();
            frame.render_widget(SummaryView::new(summary, app.summary_scroll, app.theme), layout.main);
        }
    }

    let mut footer: Vec<Line> = Vec::new();
    footer.push(match &app.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => colors.success(),
                StatusKind::Error => colors.error(),
            };
            Line::from(Span::styled(format!(" {}", status.text), Style::default().fg(color)))
        }
        None => Line::from(""),
    });
    footer.extend(
        hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim())))),
    );
    frame.render_widget(Paragraph::new(footer), layout.footer);

    render_overlay(frame, app);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let mode = match app.screen() {
        AppScreen::Editing => "Editing",
        AppScreen::Displaying => "Summary",
    };
    let info = format!(
        " {mode} | catalog: {} v{} | {} rep(s)",
        app.catalog.name,
        app.catalog.version,
        app.session.store().len()
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " eodlog ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_editing(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let snapshot = app.session.snapshot();

    let titles: Vec<String> = snapshot
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if entry.rep_code.is_empty() {
                format!("Rep {}", i + 1)
            } else {
                format!("{} {}", i + 1, entry.rep_code)
            }
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.current_entry)
        .style(Style::default().fg(colors.text_dim()))
        .highlight_style(
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, layout.tabs);

    if let Some(entry) = snapshot.get(app.current_entry) {
        let rows = app.rows();
        let card = EntryCard::new(entry, app.current_entry + 1, &app.catalog, &rows, app.theme)
            .cursor(app.row_cursor, app.category_cursor);
        frame.render_widget(card, layout.main);
    }
}

fn render_overlay(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    match &app.overlay {
        Overlay::None => {}
        Overlay::RepPicker { selected } => {
            let options = app.catalog.picker_options();
            let height = options.len() as u16 + 2;
            let popup = centered_rect(30, 0, area);
            let popup = Rect::new(popup.x, popup.y, popup.width, height.min(area.height));
            frame.render_widget(
                RepPicker {
                    options: &options,
                    selected: *selected,
                    theme: app.theme,
                },
                popup,
            );
        }
        Overlay::Prompt { field, input, .. } => {
            let popup = centered_rect(40, 0, area);
            frame.render_widget(
                Prompt {
                    field,
                    input,
                    theme: app.theme,
                },
                popup,
            );
        }
        Overlay::ConfirmReset => {
            let popup = centered_rect(40, 0, area);
            frame.render_widget(ConfirmReset { theme: app.theme }, popup);
        }
    }
}
