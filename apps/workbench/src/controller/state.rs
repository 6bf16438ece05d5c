//! View state — the active tab, the per-control idle/busy machine, and the
//! collapsible section toggles.
//!
//! Everything here is an explicit value the frontend can query; nothing is
//! inferred back from rendered output. The disclosure indicator in
//! particular is derived from the expanded flag, so the two cannot drift.

use std::collections::HashMap;

use tokio::time::Instant;

// ────────────────────────────────────────────────────────────────────────────
// Tabs
// ────────────────────────────────────────────────────────────────────────────

/// Top-level content panes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Generate,
    Prompts,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Generate, Tab::Prompts];

    pub fn name(self) -> &'static str {
        match self {
            Tab::Generate => "generate",
            Tab::Prompts => "prompts",
        }
    }

    pub fn parse(name: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|tab| tab.name() == name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Controls
// ────────────────────────────────────────────────────────────────────────────

/// The async-triggered controls. Each owns a fixed idle label and a fixed
/// busy label; `ControlState` tracks which one is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Generate,
    TestPrompts,
    Analyze,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::Generate, Control::TestPrompts, Control::Analyze];

    pub fn idle_label(self) -> &'static str {
        match self {
            Control::Generate => "🚀 Generate Cover Letter",
            Control::TestPrompts => "🧪 Test with Custom Prompts",
            Control::Analyze => "🔍 Auto-fill from Job Description",
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            Control::Generate => "⏳ Generating...",
            Control::TestPrompts => "⏳ Testing...",
            Control::Analyze => "🔍 Analyzing...",
        }
    }
}

/// Lifecycle of one control.
///
/// `Held` keeps a transient label (the analysis confidence readout) showing
/// until `revert_at` while still refusing new triggers. A handler puts the
/// control here; the frontend's timer flips it back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Busy,
    Held { label: String, revert_at: Instant },
}

// ────────────────────────────────────────────────────────────────────────────
// View state
// ────────────────────────────────────────────────────────────────────────────

pub struct ViewState {
    active_tab: Tab,
    generate: ControlState,
    test_prompts: ControlState,
    analyze: ControlState,
    /// Section id → expanded. Ids absent from the map are collapsed.
    sections: HashMap<String, bool>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::Generate,
            generate: ControlState::Idle,
            test_prompts: ControlState::Idle,
            analyze: ControlState::Idle,
            sections: HashMap::new(),
        }
    }

    /// Makes `tab` the single active pane and returns the now-current tab.
    pub fn switch_tab(&mut self, tab: Tab) -> Tab {
        self.active_tab = tab;
        self.active_tab
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active_tab == tab
    }

    fn control_mut(&mut self, control: Control) -> &mut ControlState {
        match control {
            Control::Generate => &mut self.generate,
            Control::TestPrompts => &mut self.test_prompts,
            Control::Analyze => &mut self.analyze,
        }
    }

    pub fn control(&self, control: Control) -> &ControlState {
        match control {
            Control::Generate => &self.generate,
            Control::TestPrompts => &self.test_prompts,
            Control::Analyze => &self.analyze,
        }
    }

    /// A control accepts a new trigger only while idle.
    pub fn is_idle(&self, control: Control) -> bool {
        *self.control(control) == ControlState::Idle
    }

    pub fn set_busy(&mut self, control: Control) {
        *self.control_mut(control) = ControlState::Busy;
    }

    pub fn set_idle(&mut self, control: Control) {
        *self.control_mut(control) = ControlState::Idle;
    }

    pub fn hold_label(&mut self, control: Control, label: String, revert_at: Instant) {
        *self.control_mut(control) = ControlState::Held { label, revert_at };
    }

    /// The label currently showing on `control`.
    pub fn label(&self, control: Control) -> &str {
        match self.control(control) {
            ControlState::Idle => control.idle_label(),
            ControlState::Busy => control.busy_label(),
            ControlState::Held { label, .. } => label,
        }
    }

    /// Earliest pending hold deadline, if any. The frontend arms its timer
    /// against this.
    pub fn next_revert_at(&self) -> Option<Instant> {
        Control::ALL
            .into_iter()
            .filter_map(|control| match self.control(control) {
                ControlState::Held { revert_at, .. } => Some(*revert_at),
                _ => None,
            })
            .min()
    }

    /// Flips every held control whose deadline has passed back to idle and
    /// returns the controls that changed.
    pub fn revert_expired_holds(&mut self, now: Instant) -> Vec<Control> {
        let mut reverted = Vec::new();
        for control in Control::ALL {
            let expired = match self.control(control) {
                ControlState::Held { revert_at, .. } => *revert_at <= now,
                _ => false,
            };
            if expired {
                self.set_idle(control);
                reverted.push(control);
            }
        }
        reverted
    }

    /// Toggles a collapsible section and returns its new expanded flag.
    pub fn toggle_section(&mut self, id: &str) -> bool {
        let expanded = self.sections.entry(id.to_string()).or_insert(false);
        *expanded = !*expanded;
        *expanded
    }

    pub fn section_expanded(&self, id: &str) -> bool {
        self.sections.get(id).copied().unwrap_or(false)
    }

    /// Disclosure indicator for a section, derived from the expanded flag.
    pub fn section_indicator(&self, id: &str) -> &'static str {
        if self.section_expanded(id) {
            "▲"
        } else {
            "▼"
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
