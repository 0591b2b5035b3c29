//! Terminal demo for the pageflow engine.
//!
//! Renders a deck of colored pages in the terminal and drives every
//! engine operation from the keyboard: navigation, raw viewport drags,
//! inserts, deletes, moves, reloads and layouter swaps. The frame timer
//! feeds [`PageController::tick`], so animated transitions play out on
//! screen exactly as a host application would see them.
//!
//! [`PageController`]: pageflow::PageController

use clap::Parser;
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use pageflow::config::{KeyBindings, PagerAction, ResolvedConfig};
use pageflow::{
    Axis, Curve, Layouter, LinearLayouter, PageController, PageIndex, PageSource, Point, ReuseId,
    SharedSource, Size, StackedLayouter,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Interactive demo of the pageflow page management engine.
#[derive(Parser, Debug)]
#[command(name = "pageflow")]
#[command(version)]
#[command(about = "Terminal demo of the pageflow page engine")]
pub struct Args {
    /// Number of pages in the demo deck
    #[arg(short, long)]
    pub pages: Option<usize>,

    /// Layout strategy
    #[arg(long, value_parser = ["linear", "stacked"])]
    pub layout: Option<String>,

    /// Easing curve for animated transitions
    #[arg(long, value_parser = [
        "linear", "quad-in", "quad-out", "quad-in-out", "cubic-in",
        "cubic-out", "cubic-in-out", "sine-in", "sine-out", "sine-in-out",
    ])]
    pub easing: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// Content unit the demo deck hands to the engine.
struct PageCard {
    title: String,
    color: Color,
}

/// Source over a deck of cards with stable identity across mutations.
///
/// Cards carry serial numbers, so a shifted card keeps its title and
/// color and an inserted card is visually distinct from its neighbors.
struct DeckSource {
    serials: Vec<usize>,
    next_serial: usize,
}

impl DeckSource {
    fn new(count: usize) -> Self {
        Self {
            serials: (0..count).collect(),
            next_serial: count,
        }
    }

    fn insert_card(&mut self, at: usize) {
        let at = at.min(self.serials.len());
        self.serials.insert(at, self.next_serial);
        self.next_serial += 1;
    }

    fn remove_card(&mut self, at: usize) {
        if at < self.serials.len() {
            self.serials.remove(at);
        }
    }

    fn move_card(&mut self, from: usize, to: usize) {
        if from < self.serials.len() && to < self.serials.len() {
            let serial = self.serials.remove(from);
            self.serials.insert(to, serial);
        }
    }
}

impl PageSource<PageCard> for DeckSource {
    fn page_count(&self) -> usize {
        self.serials.len()
    }

    fn page_at(&mut self, index: PageIndex, recycled: Option<PageCard>) -> Option<PageCard> {
        let serial = *self.serials.get(index.get())?;
        let color = PALETTE[serial % PALETTE.len()];
        let title = format!("Card {}", serial + 1);
        match recycled {
            Some(mut card) => {
                card.title = title;
                card.color = color;
                Some(card)
            }
            None => Some(PageCard { title, color }),
        }
    }

    fn reuse_id(&self, _index: PageIndex) -> Option<ReuseId> {
        Some(ReuseId::new("card"))
    }
}

/// How long a drag may sit still before it counts as rested.
const DRAG_REST_AFTER: Duration = Duration::from_millis(300);
/// Frame timer driving animation ticks.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

struct DemoApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: PageController<PageCard>,
    deck: Rc<RefCell<DeckSource>>,
    bindings: KeyBindings,
    axis: Axis,
    stacked: bool,
    peek: f32,
    spacing: f32,
    last_tick: Instant,
    drag_started: Option<Instant>,
}

impl DemoApp {
    fn new(config: &ResolvedConfig) -> Result<Self, io::Error> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let axis = match config.axis.as_str() {
            "vertical" => Axis::Vertical,
            _ => Axis::Horizontal,
        };
        let stacked = config.layout == "stacked";

        let deck = Rc::new(RefCell::new(DeckSource::new(config.pages)));
        let shared: SharedSource<PageCard> = deck.clone();
        let size = terminal.size()?;
        let bounds = page_area(size.width, size.height);
        let layouter: Rc<dyn Layouter> = if stacked {
            Rc::new(StackedLayouter::new(config.peek))
        } else {
            Rc::new(LinearLayouter::new(axis).with_spacing(config.spacing))
        };
        let mut controller = PageController::new(bounds, layouter, Rc::downgrade(&shared));

        controller.set_animation_duration(Duration::from_millis(config.animation_ms));
        controller.set_paging_enabled(config.paging);
        controller.set_continuous_navigation_enabled(config.continuous_navigation);
        controller.set_layout_on_rest(config.layout_on_rest);
        if let Some(curve) = Curve::from_name(&config.easing) {
            controller.set_easing(curve);
        } else {
            debug!(easing = %config.easing, "unknown easing name, keeping default");
        }
        controller
            .events_mut()
            .on_rested(|page| info!(page = page.get(), "rested"));
        controller.reload_data();

        Ok(Self {
            terminal,
            controller,
            deck,
            bindings: KeyBindings::default(),
            axis,
            stacked,
            peek: config.peek,
            spacing: config.spacing,
            last_tick: Instant::now(),
            drag_started: None,
        })
    }

    fn run(&mut self) -> Result<(), io::Error> {
        self.draw()?;
        loop {
            let mut dirty = false;
            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if let Some(action) = self.bindings.get(key) {
                            if action == PagerAction::Quit {
                                return Ok(());
                            }
                            self.apply(action);
                            dirty = true;
                        }
                    }
                    Event::Resize(width, height) => {
                        self.controller.set_bounds(page_area(width, height));
                        dirty = true;
                    }
                    _ => {}
                }
            }

            // Advance wall-clock time whether or not an event arrived, so
            // animations keep moving under key repeat.
            let now = Instant::now();
            let dt = now.duration_since(self.last_tick);
            self.last_tick = now;
            if self.controller.is_transitioning() {
                self.controller.tick(dt);
                dirty = true;
            }
            if let Some(since) = self.drag_started {
                if now.duration_since(since) >= DRAG_REST_AFTER {
                    self.drag_started = None;
                    self.controller.scroll_rested();
                    dirty = true;
                }
            }
            if dirty {
                self.draw()?;
            }
        }
    }

    fn apply(&mut self, action: PagerAction) {
        let current = self.controller.current_page();
        let count = self.controller.page_count();
        let result = match action {
            PagerAction::NextPage => self
                .controller
                .navigate_to(current.next().clamped(count), true, None),
            PagerAction::PrevPage => self.controller.navigate_to(current.prev(), true, None),
            PagerAction::FirstPage => self.controller.navigate_to(PageIndex::new(0), true, None),
            PagerAction::LastPage if count > 0 => {
                self.controller
                    .navigate_to(PageIndex::new(count - 1), true, None)
            }
            PagerAction::ScrollForward => {
                self.drag(1.0);
                Ok(())
            }
            PagerAction::ScrollBack => {
                self.drag(-1.0);
                Ok(())
            }
            PagerAction::InsertAfterCurrent => {
                let at = if count == 0 {
                    PageIndex::new(0)
                } else {
                    current.next()
                };
                self.deck.borrow_mut().insert_card(at.get());
                self.controller
                    .insert_pages([at].into_iter().collect(), true, None)
            }
            PagerAction::DeleteCurrent if count > 0 => {
                self.deck.borrow_mut().remove_card(current.get());
                self.controller
                    .delete_pages([current].into_iter().collect(), true, None)
            }
            PagerAction::MoveCurrentForward if current.get() + 1 < count => {
                self.deck
                    .borrow_mut()
                    .move_card(current.get(), current.get() + 1);
                self.controller
                    .move_page(current, current.next(), true, None)
            }
            PagerAction::MoveCurrentBack if current.get() > 0 => {
                self.deck
                    .borrow_mut()
                    .move_card(current.get(), current.get() - 1);
                self.controller
                    .move_page(current, current.prev(), true, None)
            }
            PagerAction::SwapLayouter => {
                self.stacked = !self.stacked;
                let layouter: Rc<dyn Layouter> = if self.stacked {
                    Rc::new(StackedLayouter::new(self.peek))
                } else {
                    Rc::new(LinearLayouter::new(self.axis).with_spacing(self.spacing))
                };
                self.controller.set_layouter(layouter, true, None);
                Ok(())
            }
            PagerAction::Reload => {
                self.controller.reload_data();
                Ok(())
            }
            PagerAction::TogglePaging => {
                let paging = !self.controller.paging_enabled();
                self.controller.set_paging_enabled(paging);
                Ok(())
            }
            // Guarded arms that did not match fall through as no-ops.
            _ => Ok(()),
        };
        if let Err(error) = result {
            debug!(%error, "demo action rejected");
        }
    }

    /// Simulate one notch of a host scroll gesture. The rest signal fires
    /// later from the frame timer, once the drag stops moving.
    fn drag(&mut self, direction: f32) {
        let offset = self.controller.offset();
        let step = if self.stacked || self.axis == Axis::Vertical {
            Point::new(offset.x, offset.y + direction * 3.0)
        } else {
            Point::new(offset.x + direction * 8.0, offset.y)
        };
        self.controller.scroll_to(step);
        self.drag_started = Some(Instant::now());
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let controller = &self.controller;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let offset = controller.offset();
            for (index, card) in controller.loaded_pages() {
                let Some(page_frame) = controller.frame_for_page(index) else {
                    continue;
                };
                let Some(cells) = to_cells(page_frame.x - offset.x, page_frame.y - offset.y,
                    page_frame.width, page_frame.height, area) else {
                    continue;
                };
                let percent = (controller.visible_percentage_at(index) * 100.0).round();
                let title = format!(" {} ({percent}%) ", card.title);
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .style(Style::default().fg(card.color));
                frame.render_widget(block, cells);
            }

            let status = format!(
                " page {}/{}  offset ({:.0},{:.0})  {}  [h/l] nav [f/b] drag [i]ns [d]el [m/M]ove [s]wap [r]eload [p]aging [q]uit",
                controller.current_page().get() + 1,
                controller.page_count(),
                offset.x,
                offset.y,
                if controller.paging_enabled() { "paging" } else { "free" },
            );
            let bar_row = area.height.saturating_sub(1);
            let bar = CellRect::new(area.x, area.y + bar_row, area.width, 1);
            frame.render_widget(
                Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
                bar,
            );
        })?;
        Ok(())
    }
}

impl Drop for DemoApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
    }
}

/// Content area left for pages after the status bar.
fn page_area(width: u16, height: u16) -> Size {
    Size::new(f32::from(width), f32::from(height.saturating_sub(1)))
}

/// Translate a content-space rectangle into terminal cells, clipped to
/// `area`. Returns `None` when the page is entirely off screen.
fn to_cells(x: f32, y: f32, width: f32, height: f32, area: CellRect) -> Option<CellRect> {
    let x0 = x.round().max(0.0);
    let y0 = y.round().max(0.0);
    let x1 = (x + width).round().min(f32::from(area.width));
    let y1 = (y + height).round().min(f32::from(area.height.saturating_sub(1)));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(CellRect::new(
        area.x + x0 as u16,
        area.y + y0 as u16,
        (x1 - x0) as u16,
        (y1 - y0) as u16,
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Precedence chain: defaults, config file, env vars, CLI args.
    let config = {
        let config_file = pageflow::config::load_config_with_precedence(args.config.clone())?;
        let merged = pageflow::config::merge_config(config_file);
        let with_env = pageflow::config::apply_env_overrides(merged);
        pageflow::config::apply_cli_overrides(
            with_env,
            args.layout.clone(),
            args.easing.clone(),
            args.pages,
        )
    };

    pageflow::logging::init(&config.log_file_path)?;
    info!(config = ?config, "configuration resolved");

    let mut app = DemoApp::new(&config)?;
    app.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_parses_as_display_help() {
        let result = Args::try_parse_from(["pageflow", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_parses_as_display_version() {
        let result = Args::try_parse_from(["pageflow", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn no_args_leaves_every_override_unset() {
        let args = Args::parse_from(["pageflow"]);
        assert_eq!(args.pages, None);
        assert_eq!(args.layout, None);
        assert_eq!(args.easing, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn pages_flag_short_and_long() {
        assert_eq!(Args::parse_from(["pageflow", "-p", "12"]).pages, Some(12));
        assert_eq!(
            Args::parse_from(["pageflow", "--pages", "3"]).pages,
            Some(3)
        );
    }

    #[test]
    fn layout_accepts_known_strategies_only() {
        let args = Args::parse_from(["pageflow", "--layout", "stacked"]);
        assert_eq!(args.layout.as_deref(), Some("stacked"));

        let result = Args::try_parse_from(["pageflow", "--layout", "carousel"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn easing_rejects_unknown_curves() {
        let result = Args::try_parse_from(["pageflow", "--easing", "bounce"]);
        assert!(result.is_err());
    }

    #[test]
    fn easing_flows_through_the_precedence_chain() {
        use pageflow::config::{apply_cli_overrides, merge_config, ConfigFile};

        let file: ConfigFile = toml::from_str(r#"easing = "quad-in""#).expect("valid TOML");
        let merged = merge_config(Some(file));
        assert_eq!(merged.easing, "quad-in");

        let resolved = apply_cli_overrides(merged, None, Some("cubic-out".to_string()), None);
        assert_eq!(resolved.easing, "cubic-out");
    }

    #[test]
    fn config_path_flag_is_captured() {
        let args = Args::parse_from(["pageflow", "--config", "/tmp/pageflow.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/pageflow.toml")));
    }

    #[test]
    fn deck_source_refits_recycled_cards() {
        let mut deck = DeckSource::new(3);
        let recycled = PageCard {
            title: "stale".to_string(),
            color: Color::White,
        };

        let card = deck
            .page_at(PageIndex::new(1), Some(recycled))
            .expect("in range");

        assert_eq!(card.title, "Card 2");
        assert_eq!(card.color, PALETTE[1]);
    }

    #[test]
    fn deck_source_declines_out_of_range() {
        let mut deck = DeckSource::new(2);
        assert!(deck.page_at(PageIndex::new(5), None).is_none());
    }

    #[test]
    fn deck_mutations_preserve_card_identity() {
        let mut deck = DeckSource::new(3);

        // Insert after the first card; the newcomer gets a fresh serial.
        deck.insert_card(1);
        assert_eq!(deck.page_count(), 4);
        let inserted = deck.page_at(PageIndex::new(1), None).expect("in range");
        assert_eq!(inserted.title, "Card 4");
        let shifted = deck.page_at(PageIndex::new(2), None).expect("in range");
        assert_eq!(shifted.title, "Card 2");

        // Moving a card carries its serial to the new position.
        deck.move_card(1, 3);
        let moved = deck.page_at(PageIndex::new(3), None).expect("in range");
        assert_eq!(moved.title, "Card 4");

        deck.remove_card(0);
        assert_eq!(deck.page_count(), 3);
        let front = deck.page_at(PageIndex::new(0), None).expect("in range");
        assert_eq!(front.title, "Card 2");
    }

    #[test]
    fn cell_mapping_clips_offscreen_pages() {
        let area = CellRect::new(0, 0, 80, 24);
        assert!(to_cells(-100.0, 0.0, 80.0, 23.0, area).is_none());
        assert!(to_cells(200.0, 0.0, 80.0, 23.0, area).is_none());

        let cells = to_cells(-10.0, 0.0, 80.0, 23.0, area).expect("partially visible");
        assert_eq!(cells.x, 0);
        assert_eq!(cells.width, 70);
    }
}
