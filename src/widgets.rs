//! State to visual mapping for the main and powersave widgets.
//!
//! The UI context never talks to a graphics toolkit directly. Each widget
//! record is turned into a small value object describing what should be on
//! screen (text, icon, colors, visibility), and the [`Renderer`] backend
//! applies it however its toolkit requires.
//!
//! # Widgets
//!
//! - [`HrVisual`]: heart rate value, icon and caption
//! - [`CscVisual`]: cadence status icon and text
//! - [`FanVisual`]: one toggle pill per fan slot
//! - [`SlotVisual`]: one line of the powersave summary
//!
//! [`Renderer`]: crate::Renderer

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use heapless::String;

use crate::colors::{
    ACCENT, CSC, DISCONNECTED, FAN_ACTIVE_ON, FAN_UNCONFIGURED, SUCCESS_ICON, TEXT_DARK, WHITE,
};
use crate::config::{LABEL_CAPACITY, SHORT_LABEL_CAPACITY};
use crate::sensor_state::{CscSensor, CscState, FanSlot, FanState, HrSensor, HrState, SensorStore};

/// Caption text (name plus status line).
pub type Label = String<LABEL_CAPACITY>;

/// Short numeric text.
pub type ShortLabel = String<SHORT_LABEL_CAPACITY>;

/// Placeholder for an unknown reading.
pub const PLACEHOLDER: &str = "--";

const NOT_CONNECTED: &str = "Not Connected";
const NOT_CONFIGURED: &str = "Not Configured";

fn label(text: &str) -> Label {
    let mut out = Label::new();
    let _ = out.push_str(text);
    out
}

fn reading(value: u16) -> ShortLabel {
    let mut out = ShortLabel::new();
    if value == 0 {
        let _ = out.push_str(PLACEHOLDER);
    } else {
        let _ = write!(out, "{value}");
    }
    out
}

// =============================================================================
// Heart Rate
// =============================================================================

/// Icon shown next to the heart rate value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HrIcon {
    Heart,
    Disconnected,
}

/// What the heart rate widget should display.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HrVisual {
    /// BPM text, `None` hides the value label.
    pub value: Option<ShortLabel>,
    pub icon: HrIcon,
    /// Sensor name or connection status, may contain a line break.
    pub caption: Label,
}

/// Map the heart rate record to its visual.
pub fn hr_visual(hr: &HrSensor) -> HrVisual {
    match hr.state {
        HrState::Active => HrVisual {
            value: Some(reading(hr.value)),
            icon: HrIcon::Heart,
            caption: label(&hr.name),
        },
        HrState::Inactive => {
            let mut caption = Label::new();
            if hr.name.is_empty() {
                let _ = caption.push_str(NOT_CONNECTED);
            } else {
                let _ = write!(caption, "{}\n{NOT_CONNECTED}", hr.name);
            }
            HrVisual {
                value: None,
                icon: HrIcon::Disconnected,
                caption,
            }
        }
        HrState::NotConfigured => HrVisual {
            value: None,
            icon: HrIcon::Disconnected,
            caption: label(NOT_CONFIGURED),
        },
    }
}

// =============================================================================
// Cadence
// =============================================================================

/// Status icon of the cadence widget.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CscIcon {
    Checkmark,
    Error,
}

/// What the cadence widget should display.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CscVisual {
    pub icon: CscIcon,
    pub name: Label,
    pub status: Label,
}

/// Map the cadence record to its visual.
pub fn csc_visual(csc: &CscSensor) -> CscVisual {
    let (icon, status) = match csc.state {
        CscState::Active => {
            let mut status = Label::new();
            let _ = write!(status, "{} RPM", csc.cadence);
            (CscIcon::Checkmark, status)
        }
        CscState::Inactive => (CscIcon::Error, label(NOT_CONNECTED)),
        CscState::NotConfigured => (CscIcon::Error, label(NOT_CONFIGURED)),
    };
    CscVisual {
        icon,
        name: label(&csc.name),
        status,
    }
}

// =============================================================================
// Fan Pills
// =============================================================================

/// Toggle knob drawn inside a fan pill.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Knob {
    pub color: Rgb565,
    /// Knob sits on the trailing (right) edge when the fan is on.
    pub trailing: bool,
}

/// What a fan pill should display.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FanVisual {
    pub background: Rgb565,
    pub knob: Option<Knob>,
    /// Pill text and its color, `None` for an empty pill.
    pub text: Option<(&'static str, Rgb565)>,
    /// Whether the pill reacts to taps.
    pub interactive: bool,
}

/// Map a fan slot to its pill visual.
pub const fn fan_visual(fan: &FanSlot) -> FanVisual {
    match fan.state {
        FanState::NotConfigured => FanVisual {
            background: FAN_UNCONFIGURED,
            knob: None,
            text: None,
            interactive: false,
        },
        FanState::Active if fan.is_on => FanVisual {
            background: FAN_ACTIVE_ON,
            knob: Some(Knob {
                color: WHITE,
                trailing: true,
            }),
            text: Some(("On", WHITE)),
            interactive: true,
        },
        FanState::Active | FanState::Inactive => FanVisual {
            background: WHITE,
            knob: Some(Knob {
                color: SUCCESS_ICON,
                trailing: false,
            }),
            text: Some(("Off", TEXT_DARK)),
            interactive: true,
        },
        FanState::Error => FanVisual {
            background: ACCENT,
            knob: None,
            text: Some(("Error", WHITE)),
            interactive: true,
        },
    }
}

/// Whether switching this fan animates its background.
#[inline]
pub const fn fan_fades(fan: &FanSlot) -> bool {
    matches!(fan.state, FanState::Active | FanState::Inactive)
}

// =============================================================================
// Powersave Summary
// =============================================================================

/// Lines of the powersave summary screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SummarySlot {
    HeartRate,
    Cadence,
    Fans,
}

impl SummarySlot {
    pub const ALL: [Self; 3] = [Self::HeartRate, Self::Cadence, Self::Fans];
}

/// One summary line: a tinted icon and a short reading.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SlotVisual {
    pub icon_color: Rgb565,
    pub text: ShortLabel,
}

/// Compute the summary line for `slot` from the current sensor values.
pub fn slot_visual(slot: SummarySlot, sensors: &SensorStore) -> SlotVisual {
    match slot {
        SummarySlot::HeartRate => {
            let hr = sensors.hr();
            if hr.state == HrState::Active {
                SlotVisual {
                    icon_color: ACCENT,
                    text: reading(hr.value),
                }
            } else {
                SlotVisual {
                    icon_color: DISCONNECTED,
                    text: reading(0),
                }
            }
        }
        SummarySlot::Cadence => {
            let csc = sensors.csc();
            if csc.state == CscState::Active {
                let mut text = ShortLabel::new();
                let _ = write!(text, "{}", csc.cadence);
                SlotVisual {
                    icon_color: CSC,
                    text,
                }
            } else {
                SlotVisual {
                    icon_color: DISCONNECTED,
                    text: reading(0),
                }
            }
        }
        SummarySlot::Fans => {
            let configured = sensors.configured_fans();
            let running = sensors.running_fans();
            let mut text = ShortLabel::new();
            if configured == 0 {
                let _ = text.push_str(PLACEHOLDER);
            } else {
                let _ = write!(text, "{running}/{configured}");
            }
            SlotVisual {
                icon_color: if running > 0 { SUCCESS_ICON } else { DISCONNECTED },
                text,
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
