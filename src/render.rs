//! Draws a [`View`] onto any RGB565 `embedded-graphics` target.
//!
//! Layout is fixed for the badge's 320x170 landscape LCD.

use alloc::format;

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{
            FONT_6X10,
            FONT_10X20,
        },
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        Line,
        PrimitiveStyle,
        PrimitiveStyleBuilder,
        Rectangle,
        StrokeAlignment,
    },
    text::{
        Alignment,
        Baseline,
        Text,
        TextStyleBuilder,
    },
};

use crate::constants::display::{
    GRAPH_PIXEL,
    SCREEN_WIDTH,
};
use crate::view::{
    Graph,
    LiveView,
    View,
};

const MARGIN_X: i32 = 5;
const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;
const LAST_COLUMN: i32 = SCREEN_WIDTH as i32 - 1;

// ── Live screen rows ────────────────────────────────────────────────────────
const READING_Y: i32 = 2;
const TOP_RULE_Y: i32 = 26;
/// Top-left corner of the graph band.
pub const GRAPH_ORIGIN: Point = Point::new(32, 30);
const BOTTOM_RULE_Y: i32 = 114;
const MODE_Y: i32 = 120;
const THRESHOLD_Y: i32 = 145;

pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
pub const TEXT: Rgb565 = Rgb565::WHITE;
pub const TRACE: Rgb565 = Rgb565::GREEN;
pub const ALERT: Rgb565 = Rgb565::RED;
pub const COUNTER: Rgb565 = Rgb565::YELLOW;

/// Clear the target and draw `view`.
pub fn draw_view<D, const N: usize>(target: &mut D, view: &View<'_, N>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(BACKGROUND)?;
    match view {
        View::Statistics { alerts } => draw_statistics(target, *alerts),
        View::Alert => draw_alert(target),
        View::Live(live) => draw_live(target, live),
    }
}

/// Boot screen with the firmware version.
pub fn draw_splash<D>(target: &mut D, version: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(BACKGROUND)?;
    let large = MonoTextStyle::new(&FONT_10X20, TEXT);
    Text::with_baseline("System active", Point::new(MARGIN_X, 10), large, Baseline::Top)
        .draw(target)?;
    Text::with_baseline(&format!("v{version}"), Point::new(MARGIN_X, 40), large, Baseline::Top)
        .draw(target)?;
    Ok(())
}

fn draw_statistics<D>(target: &mut D, alerts: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let title = MonoTextStyle::new(&FONT_10X20, TEXT);
    let counter = MonoTextStyle::new(&FONT_10X20, COUNTER);
    Text::with_baseline("Statistics mode", Point::new(MARGIN_X, 10), title, Baseline::Top)
        .draw(target)?;
    Text::with_baseline(
        &format!("Alerts: {alerts}"),
        Point::new(MARGIN_X, 40),
        counter,
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

fn draw_alert<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(&FONT_10X20, ALERT);
    let centered = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();

    let frame = PrimitiveStyleBuilder::new()
        .stroke_color(ALERT)
        .stroke_width(4)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();
    target.bounding_box().into_styled(frame).draw(target)?;

    for (line, y) in [("ALERT!", 40), ("Maximum level", 75), ("exceeded!", 100)] {
        Text::with_text_style(line, Point::new(CENTER_X, y), style, centered).draw(target)?;
    }
    Ok(())
}

fn draw_live<D, const N: usize>(target: &mut D, live: &LiveView<'_, N>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let large = MonoTextStyle::new(&FONT_10X20, TEXT);
    let small = MonoTextStyle::new(&FONT_6X10, TEXT);
    let rule = PrimitiveStyle::with_stroke(TEXT, 1);

    Text::with_baseline(
        &format!("{:.1} dB", live.reading),
        Point::new(MARGIN_X, READING_Y),
        large,
        Baseline::Top,
    )
    .draw(target)?;

    Line::new(Point::new(0, TOP_RULE_Y), Point::new(LAST_COLUMN, TOP_RULE_Y))
        .into_styled(rule)
        .draw(target)?;
    draw_graph(target, &live.graph)?;
    Line::new(Point::new(0, BOTTOM_RULE_Y), Point::new(LAST_COLUMN, BOTTOM_RULE_Y))
        .into_styled(rule)
        .draw(target)?;

    Text::with_baseline(live.mode.label(), Point::new(MARGIN_X, MODE_Y), large, Baseline::Top)
        .draw(target)?;
    Text::with_baseline(
        &format!("Limit: {:.1} dB", live.threshold),
        Point::new(MARGIN_X, THRESHOLD_Y),
        small,
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}

fn draw_graph<D, const N: usize>(target: &mut D, graph: &Graph<'_, N>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let step = GRAPH_PIXEL as i32;
    let dot = Size::new_equal(GRAPH_PIXEL);
    for (column, row) in graph.points() {
        let corner = GRAPH_ORIGIN + Point::new(column * step, row * step);
        target.fill_solid(&Rectangle::new(corner, dot), TRACE)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertState;
    use crate::history::HistoryBuffer;
    use crate::mode::Mode;
    use crate::view::assemble;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::convert::Infallible;

    const UNPAINTED: Rgb565 = Rgb565::new(3, 5, 7);
    const W: usize = 320;
    const H: usize = 170;

    struct Canvas {
        pixels: Vec<Rgb565>,
    }

    impl Canvas {
        fn new() -> Self {
            Self {
                pixels: vec![UNPAINTED; W * H],
            }
        }

        fn at(&self, x: i32, y: i32) -> Rgb565 {
            self.pixels[y as usize * W + x as usize]
        }

        fn count(&self, color: Rgb565) -> usize {
            self.pixels.iter().filter(|&&p| p == color).count()
        }

        fn all_within(&self, color: Rgb565, area: Rectangle) -> bool {
            (0..H as i32).all(|y| {
                (0..W as i32).all(|x| self.at(x, y) != color || area.contains(Point::new(x, y)))
            })
        }
    }

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size {
            Size::new(W as u32, H as u32)
        }
    }

    impl DrawTarget for Canvas {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if (0..W as i32).contains(&point.x) && (0..H as i32).contains(&point.y) {
                    self.pixels[point.y as usize * W + point.x as usize] = color;
                }
            }
            Ok(())
        }
    }

    fn render(mode: Mode, alert: AlertState, history: &HistoryBuffer) -> Canvas {
        let mut canvas = Canvas::new();
        let reading = history.latest().unwrap_or(30.0);
        let view = assemble(mode, alert, reading, 100.0, history, 3);
        draw_view(&mut canvas, &view).unwrap();
        canvas
    }

    #[test]
    fn test_every_view_clears_the_screen() {
        let history = HistoryBuffer::new();
        for (mode, alert) in [
            (Mode::Monitoring, AlertState::Quiet),
            (Mode::Monitoring, AlertState::Alerting),
            (Mode::Statistics, AlertState::Quiet),
        ] {
            let canvas = render(mode, alert, &history);
            assert_eq!(canvas.count(UNPAINTED), 0);
        }
    }

    #[test]
    fn test_live_graph_stays_in_band() {
        let mut history = HistoryBuffer::new();
        for i in 0..200 {
            history.record(30.0 + (i % 60) as f32);
        }
        let canvas = render(Mode::Monitoring, AlertState::Quiet, &history);
        let band = Rectangle::new(GRAPH_ORIGIN, Size::new(128 * 2, 41 * 2));
        assert!(canvas.count(TRACE) > 0);
        assert!(canvas.all_within(TRACE, band));
        assert_eq!(canvas.count(ALERT), 0);
    }

    #[test]
    fn test_live_graph_plots_oldest_left() {
        let mut history = HistoryBuffer::new();
        history.record(40.0);
        let canvas = render(Mode::Monitoring, AlertState::Quiet, &history);
        // Unwritten slots sit on the baseline, the newest reading tops the band.
        assert_eq!(canvas.at(GRAPH_ORIGIN.x, GRAPH_ORIGIN.y + 80), TRACE);
        assert_eq!(canvas.at(GRAPH_ORIGIN.x + 127 * 2, GRAPH_ORIGIN.y), TRACE);
    }

    #[test]
    fn test_alert_banner_is_red() {
        let history = HistoryBuffer::new();
        let canvas = render(Mode::Monitoring, AlertState::Alerting, &history);
        assert!(canvas.count(ALERT) > 0);
        assert_eq!(canvas.count(TRACE), 0);
    }

    #[test]
    fn test_statistics_shows_counter_only() {
        let mut history = HistoryBuffer::new();
        history.record(90.0);
        let canvas = render(Mode::Statistics, AlertState::Quiet, &history);
        assert!(canvas.count(COUNTER) > 0);
        assert_eq!(canvas.count(TRACE), 0);
        assert_eq!(canvas.count(ALERT), 0);
    }

    #[test]
    fn test_splash_draws_text() {
        let mut canvas = Canvas::new();
        draw_splash(&mut canvas, "0.1.0").unwrap();
        assert!(canvas.count(TEXT) > 0);
        assert_eq!(canvas.count(UNPAINTED), 0);
    }
}
