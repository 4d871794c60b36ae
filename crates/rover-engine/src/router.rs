//! Raw controller events to control intents.

use rover_errors::ValidationError;
use rover_gearbox::GearboxMode;
use rover_input::{ControllerFamily, RawInputEvent, StickNormalizer, codes};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What the driver asked for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum ControlEvent {
    /// Left stick vertical, `-100.0..=100.0`.
    Throttle(f32),
    /// Left stick horizontal, `-100.0..=100.0`.
    Steering(f32),
    /// Right trigger boost, `0.0..=1.0`.
    Bump(f32),
    GearUp,
    GearDown,
    SetMode(GearboxMode),
    ToggleMotors,
    Horn,
    Effect,
}

/// Button-triggered actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    GearUp,
    GearDown,
    Horn,
    Effect,
    Mode(GearboxMode),
    ToggleMotors,
}

impl From<ButtonAction> for ControlEvent {
    fn from(action: ButtonAction) -> Self {
        match action {
            ButtonAction::GearUp => ControlEvent::GearUp,
            ButtonAction::GearDown => ControlEvent::GearDown,
            ButtonAction::Horn => ControlEvent::Horn,
            ButtonAction::Effect => ControlEvent::Effect,
            ButtonAction::Mode(mode) => ControlEvent::SetMode(mode),
            ButtonAction::ToggleMotors => ControlEvent::ToggleMotors,
        }
    }
}

/// Key codes bound to each button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonMap {
    pub gear_up: u16,
    pub gear_down: u16,
    pub horn: u16,
    pub effect: u16,
    pub manual: u16,
    pub auto_sport: u16,
    pub auto_comfort: u16,
    pub motor_toggle: u16,
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self {
            gear_up: codes::BTN_TR,
            gear_down: codes::BTN_TL,
            horn: codes::BTN_X,
            effect: codes::BTN_Y,
            manual: codes::BTN_SELECT,
            auto_sport: codes::BTN_A,
            auto_comfort: codes::BTN_B,
            motor_toggle: codes::BTN_THUMBL,
        }
    }
}

impl ButtonMap {
    fn bindings(&self) -> [(u16, ButtonAction); 8] {
        [
            (self.gear_up, ButtonAction::GearUp),
            (self.gear_down, ButtonAction::GearDown),
            (self.horn, ButtonAction::Horn),
            (self.effect, ButtonAction::Effect),
            (self.manual, ButtonAction::Mode(GearboxMode::Manual)),
            (self.auto_sport, ButtonAction::Mode(GearboxMode::AutoSport)),
            (self.auto_comfort, ButtonAction::Mode(GearboxMode::AutoComfort)),
            (self.motor_toggle, ButtonAction::ToggleMotors),
        ]
    }

    /// Action bound to a key code.
    pub fn action(&self, code: u16) -> Option<ButtonAction> {
        self.bindings()
            .into_iter()
            .find_map(|(bound, action)| (bound == code).then_some(action))
    }

    /// Reject maps that bind one code to two actions.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let bindings = self.bindings();
        for (i, (code, action)) in bindings.iter().enumerate() {
            if let Some((_, other)) = bindings.iter().skip(i + 1).find(|(c, _)| c == code) {
                return Err(ValidationError::constraint(format!(
                    "button code {code} is bound to both {action:?} and {other:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Decodes raw events for one controller family.
#[derive(Debug, Clone, Copy)]
pub struct InputRouter {
    family: ControllerFamily,
    normalizer: StickNormalizer,
    buttons: ButtonMap,
}

impl InputRouter {
    /// Router for `family` sticks with the given dead zone and button map.
    pub fn new(family: ControllerFamily, deadzone_percent: u32, buttons: ButtonMap) -> Self {
        Self {
            family,
            normalizer: StickNormalizer::with_deadzone(family, deadzone_percent),
            buttons,
        }
    }

    /// Controller family the axes are normalized for.
    pub fn family(&self) -> ControllerFamily {
        self.family
    }

    /// Button code assignments.
    pub fn buttons(&self) -> &ButtonMap {
        &self.buttons
    }

    /// Translate one raw event. Unbound codes, releases and autorepeat
    /// yield `None`.
    pub fn route(&self, event: &RawInputEvent) -> Option<ControlEvent> {
        let routed = if event.is_axis() {
            self.route_axis(event)
        } else if event.is_press() {
            self.buttons.action(event.code).map(ControlEvent::from)
        } else {
            None
        };
        trace!(kind = event.kind, code = event.code, value = event.value, ?routed, "input");
        routed
    }

    fn route_axis(&self, event: &RawInputEvent) -> Option<ControlEvent> {
        match event.code {
            codes::ABS_X => Some(ControlEvent::Steering(
                self.normalizer.normalize(event.axis_reading()),
            )),
            codes::ABS_Y => Some(ControlEvent::Throttle(
                self.normalizer.normalize(event.axis_reading()),
            )),
            code if code == self.family.trigger_code() => {
                Some(ControlEvent::Bump(self.family.trigger_fraction(event.value)))
            }
            _ => None,
        }
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(
            ControllerFamily::default(),
            rover_input::DEFAULT_DEADZONE_PERCENT,
            ButtonMap::default(),
        )
    }
}
