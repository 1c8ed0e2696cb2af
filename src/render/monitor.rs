//! Full patient-monitor layout
//! Location: src/render/monitor.rs
//!
//! Header with device, patient and elapsed time; one strip chart per waveform
//! with its numeric in the value panel; a five-column panel of secondary
//! numerics at the bottom.

use super::settings::Color;
use super::strip_chart::{Grid, StripChart};
use super::surface::{DrawSurface, Point, Rect};
use crate::alarms::{AlarmParameter, AlarmReport, AlarmStatus, AlarmThresholds};
use crate::config::constants::baseline;
use crate::config::DisplayConfig;
use crate::store::{DeviceId, VitalSignsSnapshot};
use crate::synth::WaveformKind;
use crate::utils::time::{format_clock, format_elapsed, SystemTimeProvider, TimeProvider};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Fallbacks shown when a device does not report these numerics
mod fallback {
    pub const CVP1: &str = "5.3";
    pub const PSI: &str = "65";
    pub const GAS1_EXPIRED: &str = "5.4";
    pub const GAS1_AGENT: &str = "DES";
    pub const VNT_INFO: &str = "19 (4)";
}

const PSI_COLOR: Color = Color::rgb(0xBB, 0x66, 0xDD);
const HEADER_COLOR: Color = Color::GRAY;
const DEMO_BADGE: &str = "DEMO";
const PATIENT_ID_RANGE: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSize {
    Large,
    Normal,
}

/// One labelled numeric
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub name: &'static str,
    pub value: String,
    pub color: Color,
    pub size: ReadingSize,
}

impl Reading {
    fn new(name: &'static str, value: impl Into<String>, color: Color, size: ReadingSize) -> Self {
        Self {
            name,
            value: value.into(),
            color,
            size,
        }
    }

    fn alarmed(mut self, status: AlarmStatus) -> Self {
        if let Some(color) = status.color() {
            self.color = color;
        }
        self
    }
}

/// Formatted numerics for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReadout {
    pub timer: String,
    pub left: Vec<Reading>,
    pub main: Vec<Reading>,
    pub bottom: Vec<Reading>,
}

fn format_optional(value: Option<f32>, fallback: f32) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{}", v),
        _ => format!("{}", fallback),
    }
}

impl MonitorReadout {
    pub fn from_snapshot(snapshot: &VitalSignsSnapshot, alarms: &AlarmReport, elapsed: Duration) -> Self {
        use ReadingSize::{Large, Normal};

        let pvi = match snapshot.pvi {
            Some(v) if v != 0.0 => format!("{}", v.round()),
            _ => format!("{}", baseline::PVI),
        };

        let main = vec![
            Reading::new("HR", format!("{}", snapshot.hr.round()), Color::GREEN, Large)
                .alarmed(alarms.status(AlarmParameter::Hr)),
            Reading::new("SPO2", format!("{}", snapshot.spo2), Color::DEEP_SKY_BLUE, Large)
                .alarmed(alarms.status(AlarmParameter::Spo2)),
            Reading::new("BIS", format!("{}", snapshot.bis.round()), Color::MAGENTA, Large),
            Reading::new("CVP1", fallback::CVP1, Color::ORANGE, Large),
            Reading::new("ETCO2", format!("{}", snapshot.etco2.round()), Color::YELLOW, Large),
            Reading::new("RR_CO2", format!("{}", snapshot.rr.round()), Color::YELLOW, Normal)
                .alarmed(alarms.status(AlarmParameter::Rr)),
            Reading::new("PSI", fallback::PSI, PSI_COLOR, Large),
            Reading::new("PVI", pvi, Color::RED, Large),
            Reading::new(
                "NIBP",
                format!("{}/{}", snapshot.nibp.systolic, snapshot.nibp.diastolic),
                Color::WHITE,
                Large,
            )
            .alarmed(alarms.status(AlarmParameter::Bp)),
            Reading::new("MAP", format!("{}", snapshot.nibp.mean), Color::WHITE, Normal),
            Reading::new(
                "FLOW_RATE",
                format_optional(snapshot.flow_rate, baseline::FLOW_RATE),
                Color::WHITE,
                Normal,
            ),
            Reading::new("VNT", format_optional(snapshot.vnt, baseline::VNT), Color::WHITE, Normal),
            Reading::new(
                "VNT_SUB",
                format_optional(snapshot.vnt_sub, baseline::VNT_SUB),
                Color::WHITE,
                Normal,
            ),
            Reading::new("BT", format!("{:.1}", snapshot.temp), Color::KHAKI, Large)
                .alarmed(alarms.status(AlarmParameter::Temp)),
        ];

        Self {
            timer: format_elapsed(elapsed),
            left: vec![
                Reading::new("GAS1_EXPIRED", fallback::GAS1_EXPIRED, Color::DEEP_SKY_BLUE, Normal),
                Reading::new("GAS1_AGENT", fallback::GAS1_AGENT, Color::DEEP_SKY_BLUE, Normal),
            ],
            main,
            bottom: vec![Reading::new(
                "TOTAL_VOL",
                format_optional(snapshot.total_vol, baseline::TOTAL_VOL),
                Color::WHITE,
                Normal,
            )],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Reading> {
        self.left
            .iter()
            .chain(&self.main)
            .chain(&self.bottom)
            .find(|r| r.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|r| r.value.as_str())
    }

    /// Numeric shown next to a waveform strip
    pub fn for_waveform(&self, kind: WaveformKind) -> Option<&Reading> {
        self.get(kind.value_label())
    }
}

/// Bottom panel columns and the readings each one lists
const BOTTOM_COLUMNS: [(&str, &[&str]); 5] = [
    ("VNT", &["VNT", "VNT_SUB", "VNT_INFO"]),
    ("NIBP", &["NIBP", "MAP"]),
    ("PVI", &["PVI"]),
    ("FLOW", &["FLOW_RATE", "TOTAL_VOL"]),
    ("BT", &["BT"]),
];

/// Regions of a monitor drawn on one surface
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorLayout {
    pub header: Rect,
    pub strips: Vec<Rect>,
    pub footer: Rect,
    pub panel_width: f32,
}

impl MonitorLayout {
    /// Split `bounds` into header, one row per strip and the footer
    pub fn compute(bounds: Rect, config: &DisplayConfig) -> Self {
        let unit = (bounds.height * 0.06).clamp(1.0, 20.0);
        let header = Rect::new(bounds.x, bounds.y, bounds.width, unit);
        let footer = Rect::new(bounds.x, bounds.bottom() - 2.0 * unit, bounds.width, 2.0 * unit);
        let body = (bounds.height - 3.0 * unit).max(0.0);
        let count = WaveformKind::DISPLAY_ORDER.len() as f32;
        let strip_height = body / count;
        let strips = (0..WaveformKind::DISPLAY_ORDER.len())
            .map(|i| Rect::new(bounds.x, header.bottom() + i as f32 * strip_height, bounds.width, strip_height))
            .collect();
        let scale = if config.width == 0 {
            1.0
        } else {
            bounds.width / config.width as f32
        };

        Self {
            header,
            strips,
            footer,
            panel_width: config.value_panel_width as f32 * scale,
        }
    }
}

/// One device's monitor: strip charts plus numerics
pub struct PatientMonitor {
    device_id: DeviceId,
    patient_id: String,
    is_demo: bool,
    config: DisplayConfig,
    strips: Vec<StripChart>,
    thresholds: AlarmThresholds,
    clock: Arc<dyn TimeProvider>,
    started_at: u64,
    frames: u64,
}

impl PatientMonitor {
    pub fn new(device_id: impl Into<DeviceId>, config: DisplayConfig) -> Self {
        let patient_id = format!("PT-{}", rand::thread_rng().gen_range(0..PATIENT_ID_RANGE));
        Self::with_clock(device_id, config, Arc::new(SystemTimeProvider)).with_patient_id(patient_id)
    }

    /// Monitor whose header timer reads `clock`
    pub fn with_clock(device_id: impl Into<DeviceId>, config: DisplayConfig, clock: Arc<dyn TimeProvider>) -> Self {
        let width = config.trace_width();
        let strips = WaveformKind::DISPLAY_ORDER
            .iter()
            .map(|&kind| StripChart::new(kind, config.waveforms.get(kind).clone(), width))
            .collect();
        let started_at = clock.now_nanos();

        Self {
            device_id: device_id.into(),
            patient_id: "PT-0".to_string(),
            is_demo: true,
            config,
            strips,
            thresholds: AlarmThresholds::default(),
            clock,
            started_at,
            frames: 0,
        }
    }

    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = patient_id.into();
        self
    }

    pub fn with_demo(mut self, is_demo: bool) -> Self {
        self.is_demo = is_demo;
        self
    }

    pub fn with_thresholds(mut self, thresholds: AlarmThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn is_demo(&self) -> bool {
        self.is_demo
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn strips(&self) -> &[StripChart] {
        &self.strips
    }

    pub fn strip(&self, kind: WaveformKind) -> Option<&StripChart> {
        self.strips.iter().find(|s| s.kind() == kind)
    }

    /// Frames advanced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed_since(self.started_at)
    }

    /// Surface size that fits five strips at the configured geometry
    pub fn preferred_size(config: &DisplayConfig) -> (usize, usize) {
        let strips = config.height * WaveformKind::DISPLAY_ORDER.len();
        // Header plus a two-row footer at the 20 px row unit.
        (config.width, strips + 60)
    }

    /// Scroll every strip by one frame
    pub fn advance(&mut self, snapshot: &VitalSignsSnapshot) {
        let apply_speed = self.config.apply_speed;
        for strip in &mut self.strips {
            strip.tick_frame(snapshot.waveform(strip.kind()), apply_speed);
        }
        self.frames += 1;
    }

    pub fn readout(&self, snapshot: &VitalSignsSnapshot) -> MonitorReadout {
        MonitorReadout::from_snapshot(snapshot, &self.thresholds.evaluate(snapshot), self.elapsed())
    }

    pub fn header_text(&self) -> String {
        let mut header = format!(
            "{}  {}  {}",
            self.device_id,
            self.patient_id,
            format_clock(self.elapsed())
        );
        if self.is_demo {
            header.push_str("  ");
            header.push_str(DEMO_BADGE);
        }
        header
    }

    /// Redraw the whole monitor
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, snapshot: &VitalSignsSnapshot) {
        let layout = MonitorLayout::compute(surface.bounds(), &self.config);
        let readout = self.readout(snapshot);
        let grid = Grid::from(&self.config);

        surface.clear(Color::BLACK);
        surface.draw_text(Point::new(layout.header.x, layout.header.y), &self.header_text(), HEADER_COLOR);

        for (strip, area) in self.strips.iter().zip(&layout.strips) {
            let panel = strip.draw(surface, *area, layout.panel_width, grid);
            if let Some(reading) = readout.for_waveform(strip.kind()) {
                Self::draw_panel_value(surface, panel, reading);
            }
        }

        self.draw_footer(surface, layout.footer, &readout);
    }

    fn draw_panel_value<S: DrawSurface + ?Sized>(surface: &mut S, panel: Rect, reading: &Reading) {
        let inset = (panel.width * 0.05).min(5.0);
        surface.draw_text(Point::new(panel.x + inset, panel.y), reading.name, reading.color);
        surface.draw_text(
            Point::new(panel.x + inset, panel.y + panel.height * 0.4),
            &reading.value,
            reading.color,
        );
    }

    fn draw_footer<S: DrawSurface + ?Sized>(&self, surface: &mut S, footer: Rect, readout: &MonitorReadout) {
        let column_width = footer.width / BOTTOM_COLUMNS.len() as f32;
        for (i, (title, names)) in BOTTOM_COLUMNS.iter().enumerate() {
            let x = footer.x + i as f32 * column_width;
            let values: Vec<&str> = names
                .iter()
                .map(|name| match *name {
                    "VNT_INFO" => fallback::VNT_INFO,
                    other => readout.value(other).unwrap_or("--"),
                })
                .collect();
            let color = names
                .first()
                .and_then(|name| readout.get(name))
                .map(|r| r.color)
                .unwrap_or(Color::WHITE);
            surface.draw_text(Point::new(x, footer.y), title, HEADER_COLOR);
            surface.draw_text(Point::new(x, footer.y + footer.height / 2.0), &values.join(" "), color);
        }
    }
}

impl std::fmt::Debug for PatientMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientMonitor")
            .field("device_id", &self.device_id)
            .field("patient_id", &self.patient_id)
            .field("is_demo", &self.is_demo)
            .field("frames", &self.frames)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarms::evaluate;
    use crate::render::framebuffer::Framebuffer;
    use crate::render::text_canvas::TextCanvas;
    use crate::store::snapshot::tests::sample_snapshot;
    use crate::utils::time::MockTimeProvider;

    fn monitor() -> (PatientMonitor, Arc<MockTimeProvider>) {
        let clock = Arc::new(MockTimeProvider::new(1_000));
        let monitor = PatientMonitor::with_clock("OR01", DisplayConfig::default(), clock.clone())
            .with_patient_id("PT-42");
        (monitor, clock)
    }

    #[test]
    fn test_readout_formats() {
        let mut snap = sample_snapshot();
        snap.hr = 71.6;
        snap.spo2 = 97.5;
        snap.temp = 37.0;
        snap.vnt = None;
        let readout = MonitorReadout::from_snapshot(&snap, &evaluate(&snap), Duration::from_secs(3725));

        assert_eq!(readout.timer, "1h 2m 5s");
        assert_eq!(readout.value("HR"), Some("72"));
        assert_eq!(readout.value("SPO2"), Some("97.5"));
        assert_eq!(readout.value("NIBP"), Some("114/61"));
        assert_eq!(readout.value("MAP"), Some("79"));
        assert_eq!(readout.value("BT"), Some("37.0"));
        assert_eq!(readout.value("VNT"), Some("382"));
        assert_eq!(readout.value("CVP1"), Some("5.3"));
        assert_eq!(readout.value("GAS1_AGENT"), Some("DES"));
        assert_eq!(readout.value("TOTAL_VOL"), Some("2623"));
        assert_eq!(readout.for_waveform(WaveformKind::Eeg).unwrap().name, "BIS");
    }

    #[test]
    fn test_alarm_recolours_values() {
        let mut snap = sample_snapshot();
        snap.hr = 155.0;
        snap.rr = 14.0;
        let readout = MonitorReadout::from_snapshot(&snap, &evaluate(&snap), Duration::ZERO);
        assert_eq!(readout.get("HR").unwrap().color, Color::ALARM_CRITICAL);
        assert_eq!(readout.get("RR_CO2").unwrap().color, Color::YELLOW);
        assert_eq!(readout.get("BIS").unwrap().color, Color::MAGENTA);
    }

    #[test]
    fn test_header_uses_injected_clock() {
        let (monitor, clock) = monitor();
        clock.advance_secs(3 * 3600 + 61);
        assert_eq!(monitor.header_text(), "OR01  PT-42  03:01:01  DEMO");
        assert_eq!(monitor.with_demo(false).header_text(), "OR01  PT-42  03:01:01");
    }

    #[test]
    fn test_strips_follow_display_order() {
        let (monitor, _) = monitor();
        let kinds: Vec<WaveformKind> = monitor.strips().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, WaveformKind::DISPLAY_ORDER.to_vec());
        assert!(monitor.strips().iter().all(|s| s.len() == 700));
    }

    #[test]
    fn test_advance_scrolls_every_strip() {
        let (mut monitor, _) = monitor();
        let snap = sample_snapshot();
        for _ in 0..10 {
            monitor.advance(&snap);
        }
        assert_eq!(monitor.frames(), 10);
        assert_eq!(monitor.strip(WaveformKind::Eeg).unwrap().latest(), Some(50.0));
        assert_eq!(monitor.strip(WaveformKind::Ecg).unwrap().len(), 700);
    }

    #[test]
    fn test_layout_at_preferred_size() {
        let config = DisplayConfig::default();
        let (w, h) = PatientMonitor::preferred_size(&config);
        assert_eq!((w, h), (800, 560));
        let layout = MonitorLayout::compute(Rect::new(0.0, 0.0, w as f32, h as f32), &config);
        assert_eq!(layout.header.height, 20.0);
        assert_eq!(layout.strips.len(), 5);
        assert_eq!(layout.strips[0], Rect::new(0.0, 20.0, 800.0, 100.0));
        assert_eq!(layout.footer, Rect::new(0.0, 520.0, 800.0, 40.0));
        assert_eq!(layout.panel_width, 100.0);
    }

    #[test]
    fn test_draw_on_framebuffer() {
        let (monitor, _) = monitor();
        let (w, h) = PatientMonitor::preferred_size(monitor.config());
        let mut fb = Framebuffer::new(w, h);
        monitor.draw(&mut fb, &sample_snapshot());

        let texts: Vec<&str> = fb.text_runs().iter().map(|r| r.text.as_str()).collect();
        for label in ["ECG", "PLETH", "EEG", "CO2", "CVP", "HR", "SPO2", "BIS", "ETCO2", "CVP1"] {
            assert!(texts.contains(&label), "missing {}", label);
        }
        assert!(texts.contains(&"114/61 79"));
        assert!(fb.count_color(Color::DEEP_SKY_BLUE) > 0);
    }

    #[test]
    fn test_draw_on_text_canvas() {
        let mut config = DisplayConfig::default();
        config.width = 80;
        config.value_panel_width = 10;
        let monitor = PatientMonitor::with_clock("ICU1", config, Arc::new(MockTimeProvider::new(0)))
            .with_patient_id("PT-7");
        let mut canvas = TextCanvas::new(80, 24);
        monitor.draw(&mut canvas, &sample_snapshot());

        let text = canvas.render_plain();
        assert!(text.starts_with("ICU1  PT-7  00:00:00  DEMO"));
        assert!(text.contains("ECG"));
        assert!(text.contains('*'));
    }
}
