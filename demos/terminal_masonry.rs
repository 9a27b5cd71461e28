//! Terminal masonry demo.
//!
//! Renders a wall of generated variable-height cards into balanced columns
//! and re-flows them as the terminal is resized across breakpoint tiers.
//!
//! Card heights become measurable only after the first frame has been
//! drawn, so every epoch visibly starts as a round-robin layout and
//! settles into the height-balanced one about 100ms later.
//!
//! Keys: `r` regenerates the cards, `q` / `Esc` / `Ctrl+C` quits.
//!
//! Run with: cargo run --example terminal_masonry

use std::cell::{Cell, RefCell};
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;

use masonry_flow::pipeline::viewport;
use masonry_flow::{Breakpoints, Masonry, MasonryOptions, MeasureFn, Strategy};
use spark_signals::{effect, flush_sync};

const CARD_COUNT: usize = 18;

#[derive(Debug, Clone)]
struct Card {
    title: String,
    rows: u16,
}

/// Deterministic card generator (xorshift; no RNG dependency needed for a
/// demo wall).
fn generate_cards(count: usize, seed: &mut u64) -> Vec<Option<Card>> {
    (0..count)
        .map(|i| {
            *seed ^= *seed << 13;
            *seed ^= *seed >> 7;
            *seed ^= *seed << 17;
            let rows = 3 + (*seed % 6) as u16;
            Some(Card {
                title: format!("card {:02}", i + 1),
                rows,
            })
        })
        .collect()
}

fn main() -> io::Result<()> {
    let options = MasonryOptions {
        columns_breakpoints: Breakpoints::from([(40.0, 1), (80.0, 2), (120.0, 3), (160.0, 4)]),
        gutter_breakpoints: Breakpoints::from([(40.0, 2.0), (120.0, 4.0)]),
        default_columns: 2,
        default_gutter: 2.0,
        ..Default::default()
    };

    let mut seed = 0x9E3779B97F4A7C15u64;
    let cards = generate_cards(CARD_COUNT, &mut seed);

    // Simulated measurement: heights are unknown until a frame containing
    // the items has been drawn, like DOM nodes before first paint.
    let painted = Rc::new(Cell::new(false));
    let heights: Rc<RefCell<Vec<Option<u16>>>> = Rc::new(RefCell::new(
        cards.iter().map(|c| c.as_ref().map(|c| c.rows)).collect(),
    ));

    let measure: MeasureFn = {
        let painted = painted.clone();
        let heights = heights.clone();
        Rc::new(move |handle| {
            if !painted.get() {
                return None;
            }
            heights
                .borrow()
                .get(handle.seq())
                .copied()
                .flatten()
                .map(f64::from)
        })
    };

    let masonry: Masonry<Card> = Masonry::new(options, measure);
    masonry.set_items(cards);

    terminal::enable_raw_mode()?;
    viewport::detect_viewport_width()?;
    let host = masonry_flow::ResponsiveHost::mount(&masonry);

    // The one render effect: re-runs whenever a layout is published.
    let layout_signal = masonry.layout();
    let distributed_signal = masonry.distributed();
    let stop_render = {
        let masonry = masonry.clone();
        let painted = painted.clone();
        effect(move || {
            let layout = layout_signal.get();
            let distributed = distributed_signal.get();
            if draw_frame(&masonry, &layout.columns, layout.strategy, distributed).is_ok() {
                painted.set(true);
            }
        })
    };

    // First paint.
    flush_sync();

    // Event pump: resize feeds the width signal, ticks drive the settle
    // retry loop, and each pass flushes pending effects (re-renders).
    loop {
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Resize(width, _height) => viewport::set_viewport_width(f64::from(width)),
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('r') => {
                        let cards = generate_cards(CARD_COUNT, &mut seed);
                        *heights.borrow_mut() =
                            cards.iter().map(|c| c.as_ref().map(|c| c.rows)).collect();
                        // New cards have not been painted yet.
                        painted.set(false);
                        masonry.set_items(cards);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        masonry.tick();
        flush_sync();
    }

    stop_render();
    host.unmount();
    terminal::disable_raw_mode()?;
    let mut out = stdout();
    out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    out.flush()
}

/// Draw the current layout as side-by-side card columns.
fn draw_frame(
    masonry: &Masonry<Card>,
    columns: &[Vec<usize>],
    strategy: Strategy,
    distributed: bool,
) -> io::Result<()> {
    let items = masonry.items();
    let config = masonry.config();
    let width = viewport::viewport_width().unwrap_or(80.0) as usize;

    let gutter = config.gutter.round() as usize;
    let count = columns.len().max(1);
    let card_width = (width.saturating_sub(gutter * count.saturating_sub(1)) / count).max(12);

    // Render each column to its own line buffer, cards stacked with one
    // blank row between them.
    let mut rendered: Vec<Vec<String>> = Vec::with_capacity(columns.len());
    for column in columns {
        let mut lines = Vec::new();
        for &seq in column {
            if let Some(Some(card)) = items.get(seq) {
                draw_card(&mut lines, card, seq, card_width);
                lines.push(String::new());
            }
        }
        rendered.push(lines);
    }

    let status = format!(
        " {} columns · gutter {} · {:?}{} — r: reshuffle · q: quit",
        config.columns,
        gutter,
        strategy,
        if distributed { " (settled)" } else { " (settling…)" },
    );

    let mut out = stdout();
    out.queue(Clear(ClearType::All))?;
    out.queue(MoveTo(0, 0))?.queue(Print(&status))?;

    let tallest = rendered.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..tallest {
        out.queue(MoveTo(0, row as u16 + 2))?;
        let mut line = String::with_capacity(width);
        for (index, column) in rendered.iter().enumerate() {
            if index > 0 {
                line.push_str(&" ".repeat(gutter));
            }
            match column.get(row) {
                Some(text) => {
                    line.push_str(text);
                    let drawn = text.chars().count();
                    if drawn < card_width {
                        line.push_str(&" ".repeat(card_width - drawn));
                    }
                }
                None => line.push_str(&" ".repeat(card_width)),
            }
        }
        out.queue(Print(&line))?;
    }

    out.flush()
}

/// Append one card box (`card.rows` body rows plus borders) to a column
/// buffer.
fn draw_card(lines: &mut Vec<String>, card: &Card, seq: usize, width: usize) {
    let inner = width.saturating_sub(2);
    lines.push(format!("╭{}╮", "─".repeat(inner)));
    for row in 0..card.rows {
        let content = if row == 0 {
            format!(" {} · #{}", card.title, seq)
        } else {
            String::new()
        };
        let mut body: String = content.chars().take(inner).collect();
        let pad = inner.saturating_sub(body.chars().count());
        body.push_str(&" ".repeat(pad));
        lines.push(format!("│{}│", body));
    }
    lines.push(format!("╰{}╯", "─".repeat(inner)));
}
