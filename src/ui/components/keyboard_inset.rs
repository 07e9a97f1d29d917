// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Animated bottom inset per screen, driven by the keyboard tracker.

use std::collections::BTreeMap;

use eframe::egui;

use crate::logic::keyboard::{
    AnimationCurve, InsetAnimation, InsetTarget, ScreenId, ScreenLookup,
};

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveAnimation {
    from: f32,
    started_at: f64,
    duration: f64,
    curve: Option<AnimationCurve>,
}

/// Bottom inset of one screen, interpolated over time.
///
/// `tick` must be fed the UI clock before the inset is read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsetModel {
    safe_area_bottom: f32,
    bottom_inset: f32,
    // Displayed inset when the target last changed.
    jump_from: f32,
    animation: Option<ActiveAnimation>,
    now: f64,
}

impl InsetModel {
    pub fn new(safe_area_bottom: f32) -> Self {
        Self {
            safe_area_bottom,
            ..Default::default()
        }
    }

    /// Advance the clock; finished animations are dropped.
    pub fn tick(&mut self, now: f64) {
        self.now = now;
        if let Some(animation) = self.animation
            && now - animation.started_at >= animation.duration
        {
            self.animation = None;
        }
    }

    /// Target inset, ignoring any running animation.
    pub fn bottom_inset(&self) -> f32 {
        self.bottom_inset
    }

    /// Inset to draw at the current clock.
    pub fn displayed(&self) -> f32 {
        let Some(animation) = self.animation else {
            return self.bottom_inset;
        };
        if animation.duration <= 0.0 {
            return self.bottom_inset;
        }

        let t = ((self.now - animation.started_at) / animation.duration) as f32;
        let eased = animation
            .curve
            .unwrap_or(AnimationCurve::Linear)
            .ease(t);
        egui::lerp(animation.from..=self.bottom_inset, eased)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

impl InsetTarget for InsetModel {
    fn safe_area_bottom(&self) -> f32 {
        self.safe_area_bottom
    }

    fn set_bottom_inset(&mut self, inset: f32) {
        self.jump_from = self.displayed();
        self.animation = None;
        self.bottom_inset = inset.max(0.0);
    }

    fn animate_layout(&mut self, animation: InsetAnimation) {
        // Unusable durations jump straight to the target.
        if !animation.duration.is_finite() || animation.duration <= 0.0 {
            self.animation = None;
            return;
        }
        self.animation = Some(ActiveAnimation {
            from: self.jump_from,
            started_at: self.now,
            duration: animation.duration,
            curve: animation.curve,
        });
    }
}

/// All screens that can carry a keyboard inset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenInsets {
    screens: BTreeMap<ScreenId, InsetModel>,
}

impl ScreenInsets {
    pub fn register(&mut self, id: ScreenId, safe_area_bottom: f32) {
        self.screens.insert(id, InsetModel::new(safe_area_bottom));
    }

    pub fn get(&self, id: &ScreenId) -> Option<&InsetModel> {
        self.screens.get(id)
    }

    pub fn get_mut(&mut self, id: &ScreenId) -> Option<&mut InsetModel> {
        self.screens.get_mut(id)
    }

    pub fn tick(&mut self, now: f64) {
        for screen in self.screens.values_mut() {
            screen.tick(now);
        }
    }

    pub fn any_animating(&self) -> bool {
        self.screens.values().any(InsetModel::is_animating)
    }
}

impl ScreenLookup for ScreenInsets {
    fn screen_mut(&mut self, id: &ScreenId) -> Option<&mut dyn InsetTarget> {
        self.screens
            .get_mut(id)
            .map(|screen| screen as &mut dyn InsetTarget)
    }
}

/// Reserve the displayed inset at the bottom of the window.
pub fn view(ui: &mut egui::Ui, inset: &InsetModel) {
    let height = inset.displayed();
    if height < 0.5 {
        return;
    }
    egui::Panel::bottom("keyboard_inset")
        .resizable(false)
        .show_separator_line(false)
        .exact_size(height)
        .frame(egui::Frame::NONE)
        .show_inside(ui, |_ui| {});
}
