// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Keyboard inset tracking.
//!
//! Keeps a screen's bottom content inset equal to the on-screen keyboard height
//! while the keyboard is visible, minus the safe area the platform already
//! reserves, and animates each change with the keyboard's own timing.
//!
//! Responsibilities:
//! - Subscription registry keyed by a distinct owner name, replacing on re-listen.
//! - Per-identifier `hidden`/`visible` state that collapses repeated events.
//! - Translating notification payloads into inset changes on an [`InsetTarget`].

use std::collections::HashMap;

use eframe::egui::{Rect, emath::easing};

/// Duration used when a hide happens without a payload (e.g. on detach).
pub const FALLBACK_HIDE_DURATION: f64 = 0.6;

/// Stable identifier a screen assigns to itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Keyboard notifications the tracker listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyboardNotification {
    WillShow,
    WillHide,
}

/// Payload delivered with a keyboard notification. Any field may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyboardEvent {
    /// Keyboard frame once the keyboard finished moving.
    pub end_frame: Option<Rect>,
    /// Seconds the keyboard animation takes.
    pub animation_duration: Option<f64>,
    /// Raw animation curve identifier.
    pub animation_curve: Option<u32>,
}

/// Timing curve of the keyboard animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationCurve {
    EaseInOut,
    EaseIn,
    EaseOut,
    Linear,
    /// The platform keyboard's own curve; any unrecognised identifier.
    Keyboard,
}

impl AnimationCurve {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::EaseInOut,
            1 => Self::EaseIn,
            2 => Self::EaseOut,
            3 => Self::Linear,
            _ => Self::Keyboard,
        }
    }

    /// Map linear progress `t` in `0..=1` onto the curve.
    pub fn ease(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::EaseInOut => easing::cubic_in_out(t),
            Self::EaseIn => easing::cubic_in(t),
            Self::EaseOut => easing::cubic_out(t),
            Self::Linear => easing::linear(t),
            Self::Keyboard => easing::quadratic_out(t),
        }
    }
}

/// Animation parameters for a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsetAnimation {
    pub duration: f64,
    pub curve: Option<AnimationCurve>,
}

/// Screen whose bottom inset follows the keyboard.
pub trait InsetTarget {
    /// Bottom area already reserved by the platform.
    fn safe_area_bottom(&self) -> f32;

    /// Set the additional bottom content inset.
    fn set_bottom_inset(&mut self, inset: f32);

    /// Animate the layout towards the current inset.
    fn animate_layout(&mut self, animation: InsetAnimation);
}

/// Resolves screen identifiers to live inset targets.
pub trait ScreenLookup {
    fn screen_mut(&mut self, id: &ScreenId) -> Option<&mut dyn InsetTarget>;
}

/// Handle of one registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

#[derive(Clone, Debug)]
struct Subscription {
    handle: SubscriptionHandle,
    owner: ScreenId,
    identifier: ScreenId,
}

/// Listener registry keyed by `(notification, distinct owner)`.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    next_handle: u64,
    entries: HashMap<(KeyboardNotification, ScreenId), Subscription>,
}

impl SubscriptionRegistry {
    /// Register a listener. An existing listener under the same key is
    /// cancelled first, so an owner never holds two for one notification.
    pub fn listen(
        &mut self,
        notification: KeyboardNotification,
        distinct_by: &ScreenId,
        identifier: &ScreenId,
    ) -> SubscriptionHandle {
        if let Some(previous) = self.discard(notification, distinct_by) {
            tracing::debug!(
                ?notification,
                owner = distinct_by.as_str(),
                ?previous,
                "Replacing keyboard subscription"
            );
        }

        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.insert(
            (notification, distinct_by.clone()),
            Subscription {
                handle,
                owner: distinct_by.clone(),
                identifier: identifier.clone(),
            },
        );
        handle
    }

    /// Remove the listener registered under `distinct_by`, if any.
    pub fn discard(
        &mut self,
        notification: KeyboardNotification,
        distinct_by: &ScreenId,
    ) -> Option<SubscriptionHandle> {
        self.entries
            .remove(&(notification, distinct_by.clone()))
            .map(|sub| sub.handle)
    }

    /// `(owner, identifier)` pairs listening to `notification`, oldest first.
    pub fn listeners(&self, notification: KeyboardNotification) -> Vec<(ScreenId, ScreenId)> {
        let mut subs: Vec<&Subscription> = self
            .entries
            .iter()
            .filter(|((n, _), _)| *n == notification)
            .map(|(_, sub)| sub)
            .collect();
        subs.sort_by_key(|sub| sub.handle);
        subs.into_iter()
            .map(|sub| (sub.owner.clone(), sub.identifier.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keyboard visibility bookkeeping plus the listener registry.
///
/// Only the UI thread may drive the handlers.
#[derive(Debug, Default)]
pub struct KeyboardInsetTracker {
    visible: HashMap<ScreenId, bool>,
    subscriptions: SubscriptionRegistry,
}

impl KeyboardInsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start following the keyboard for `owner`, tracking visibility under
    /// `target`. Attaching the same owner again replaces its listeners.
    pub fn attach(&mut self, owner: &ScreenId, target: &ScreenId) -> [SubscriptionHandle; 2] {
        let show = self
            .subscriptions
            .listen(KeyboardNotification::WillShow, owner, target);
        let hide = self
            .subscriptions
            .listen(KeyboardNotification::WillHide, owner, target);
        [show, hide]
    }

    /// Stop following the keyboard for `owner` and revert any applied inset,
    /// even if the keyboard is still up.
    pub fn detach(&mut self, owner: &ScreenId, target: &ScreenId, screen: &mut dyn InsetTarget) {
        self.subscriptions
            .discard(KeyboardNotification::WillShow, owner);
        self.subscriptions
            .discard(KeyboardNotification::WillHide, owner);

        self.on_keyboard_will_hide(None, target, screen);
    }

    /// Deliver a notification to every registered listener.
    pub fn post(
        &mut self,
        notification: KeyboardNotification,
        event: &KeyboardEvent,
        screens: &mut dyn ScreenLookup,
    ) {
        for (owner, identifier) in self.subscriptions.listeners(notification) {
            let Some(screen) = screens.screen_mut(&owner) else {
                tracing::warn!(owner = owner.as_str(), "Keyboard listener has no screen");
                continue;
            };
            match notification {
                KeyboardNotification::WillShow => {
                    self.on_keyboard_will_show(event, &identifier, screen);
                }
                KeyboardNotification::WillHide => {
                    self.on_keyboard_will_hide(Some(event), &identifier, screen);
                }
            }
        }
    }

    /// Handle a "will show" notification. Returns whether the inset changed.
    ///
    /// A show while already visible is a duplicate and does nothing. Visibility
    /// is recorded before the payload is read, so a payload missing the frame,
    /// duration, or curve skips the animation but keeps the state correct.
    pub fn on_keyboard_will_show(
        &mut self,
        event: &KeyboardEvent,
        identifier: &ScreenId,
        screen: &mut dyn InsetTarget,
    ) -> bool {
        let currently_visible = self.set_visible(identifier, true);
        if currently_visible {
            return false;
        }

        let (Some(frame), Some(duration), Some(curve)) = (
            event.end_frame,
            event.animation_duration,
            event.animation_curve,
        ) else {
            tracing::debug!(
                identifier = identifier.as_str(),
                "Keyboard show payload incomplete, skipping animation"
            );
            return false;
        };

        let height = frame.height() - screen.safe_area_bottom();
        screen.set_bottom_inset(height);
        screen.animate_layout(InsetAnimation {
            duration,
            curve: Some(AnimationCurve::from_raw(curve)),
        });

        tracing::debug!(identifier = identifier.as_str(), height, "Keyboard shown");
        true
    }

    /// Handle a "will hide" notification. `event` is `None` for the synthetic
    /// hide issued by [`Self::detach`]. Returns whether the inset changed.
    pub fn on_keyboard_will_hide(
        &mut self,
        event: Option<&KeyboardEvent>,
        identifier: &ScreenId,
        screen: &mut dyn InsetTarget,
    ) -> bool {
        let currently_visible = self.set_visible(identifier, false);
        if !currently_visible {
            return false;
        }

        let duration = event
            .and_then(|e| e.animation_duration)
            .unwrap_or(FALLBACK_HIDE_DURATION);
        let curve = event
            .and_then(|e| e.animation_curve)
            .map(AnimationCurve::from_raw);

        screen.set_bottom_inset(0.0);
        screen.animate_layout(InsetAnimation { duration, curve });

        tracing::debug!(identifier = identifier.as_str(), "Keyboard hidden");
        true
    }

    /// Whether the keyboard is currently considered visible for `identifier`.
    pub fn is_visible(&self, identifier: &ScreenId) -> bool {
        self.visible.get(identifier).copied().unwrap_or(false)
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    // Store the new flag and return the previous one.
    fn set_visible(&mut self, identifier: &ScreenId, visible: bool) -> bool {
        self.visible
            .insert(identifier.clone(), visible)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[derive(Default)]
    struct RecordingScreen {
        safe_area: f32,
        inset: f32,
        animations: Vec<InsetAnimation>,
    }

    impl InsetTarget for RecordingScreen {
        fn safe_area_bottom(&self) -> f32 {
            self.safe_area
        }

        fn set_bottom_inset(&mut self, inset: f32) {
            self.inset = inset;
        }

        fn animate_layout(&mut self, animation: InsetAnimation) {
            self.animations.push(animation);
        }
    }

    #[derive(Default)]
    struct Screens {
        screens: HashMap<ScreenId, RecordingScreen>,
    }

    impl ScreenLookup for Screens {
        fn screen_mut(&mut self, id: &ScreenId) -> Option<&mut dyn InsetTarget> {
            self.screens
                .get_mut(id)
                .map(|screen| screen as &mut dyn InsetTarget)
        }
    }

    fn show_event(height: f32) -> KeyboardEvent {
        KeyboardEvent {
            end_frame: Some(Rect::from_min_size(pos2(0.0, 500.0), vec2(400.0, height))),
            animation_duration: Some(0.25),
            animation_curve: Some(7),
        }
    }

    fn hide_event() -> KeyboardEvent {
        KeyboardEvent {
            end_frame: None,
            animation_duration: Some(0.25),
            animation_curve: Some(7),
        }
    }

    #[test]
    fn repeated_show_events_animate_once() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen::default();
        let id = ScreenId::new("login");

        assert!(tracker.on_keyboard_will_show(&show_event(300.0), &id, &mut screen));
        assert!(!tracker.on_keyboard_will_show(&show_event(300.0), &id, &mut screen));
        assert!(!tracker.on_keyboard_will_show(&show_event(320.0), &id, &mut screen));

        assert_eq!(screen.animations.len(), 1);
        assert_eq!(screen.inset, 300.0);

        assert!(tracker.on_keyboard_will_hide(Some(&hide_event()), &id, &mut screen));
        assert!(tracker.on_keyboard_will_show(&show_event(320.0), &id, &mut screen));
        assert_eq!(screen.animations.len(), 3);
        assert_eq!(screen.inset, 320.0);
    }

    #[test]
    fn hide_while_hidden_is_a_no_op() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen {
            inset: 12.0,
            ..Default::default()
        };
        let id = ScreenId::new("login");

        assert!(!tracker.on_keyboard_will_hide(Some(&hide_event()), &id, &mut screen));
        assert!(screen.animations.is_empty());
        assert_eq!(screen.inset, 12.0);
    }

    #[test]
    fn show_subtracts_safe_area_and_uses_event_timing() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen {
            safe_area: 34.0,
            ..Default::default()
        };
        let id = ScreenId::new("login");
        let event = KeyboardEvent {
            animation_curve: Some(2),
            ..show_event(300.0)
        };

        tracker.on_keyboard_will_show(&event, &id, &mut screen);

        assert_eq!(screen.inset, 266.0);
        assert_eq!(
            screen.animations,
            vec![InsetAnimation {
                duration: 0.25,
                curve: Some(AnimationCurve::EaseOut),
            }]
        );
    }

    // Visibility is still recorded when the payload is unusable.
    #[test]
    fn incomplete_show_payload_skips_animation_but_marks_visible() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen::default();
        let id = ScreenId::new("login");
        let event = KeyboardEvent {
            animation_duration: None,
            ..show_event(300.0)
        };

        assert!(!tracker.on_keyboard_will_show(&event, &id, &mut screen));
        assert!(tracker.is_visible(&id));
        assert!(screen.animations.is_empty());
        assert_eq!(screen.inset, 0.0);
    }

    #[test]
    fn hide_without_payload_uses_fallback_timing() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen::default();
        let id = ScreenId::new("login");

        tracker.on_keyboard_will_show(&show_event(300.0), &id, &mut screen);
        tracker.on_keyboard_will_hide(None, &id, &mut screen);

        assert_eq!(screen.inset, 0.0);
        assert_eq!(
            screen.animations.last(),
            Some(&InsetAnimation {
                duration: FALLBACK_HIDE_DURATION,
                curve: None,
            })
        );
    }

    #[test]
    fn hide_with_payload_uses_event_timing() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen::default();
        let id = ScreenId::new("login");
        let event = KeyboardEvent {
            animation_duration: Some(0.4),
            animation_curve: Some(1),
            ..hide_event()
        };

        tracker.on_keyboard_will_show(&show_event(300.0), &id, &mut screen);
        assert!(tracker.on_keyboard_will_hide(Some(&event), &id, &mut screen));

        assert_eq!(screen.inset, 0.0);
        assert_eq!(
            screen.animations.last(),
            Some(&InsetAnimation {
                duration: 0.4,
                curve: Some(AnimationCurve::EaseIn),
            })
        );
    }

    #[test]
    fn detach_reverts_inset_and_removes_listeners() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen::default();
        let id = ScreenId::new("login");

        tracker.attach(&id, &id);
        tracker.on_keyboard_will_show(&show_event(300.0), &id, &mut screen);
        tracker.detach(&id, &id, &mut screen);

        assert_eq!(screen.inset, 0.0);
        assert!(!tracker.is_visible(&id));
        assert!(tracker.subscriptions().is_empty());
    }

    #[test]
    fn detach_while_hidden_leaves_zero_inset() {
        let mut tracker = KeyboardInsetTracker::new();
        let mut screen = RecordingScreen::default();
        let id = ScreenId::new("login");

        tracker.attach(&id, &id);
        tracker.detach(&id, &id, &mut screen);

        assert_eq!(screen.inset, 0.0);
        assert!(screen.animations.is_empty());
    }

    #[test]
    fn reattach_replaces_previous_subscriptions() {
        let mut tracker = KeyboardInsetTracker::new();
        let id = ScreenId::new("login");

        let first = tracker.attach(&id, &id);
        let second = tracker.attach(&id, &id);

        assert_ne!(first, second);
        assert_eq!(tracker.subscriptions().len(), 2);
        assert_eq!(
            tracker
                .subscriptions()
                .listeners(KeyboardNotification::WillShow)
                .len(),
            1
        );
    }

    #[test]
    fn post_reaches_only_attached_owners() {
        let mut tracker = KeyboardInsetTracker::new();
        let login = ScreenId::new("login");
        let vault = ScreenId::new("vault");
        let mut screens = Screens::default();
        screens.screens.insert(login.clone(), RecordingScreen::default());
        screens.screens.insert(vault.clone(), RecordingScreen::default());

        tracker.attach(&login, &login);
        tracker.attach(&vault, &vault);
        tracker.detach(&vault, &vault, screens.screens.get_mut(&vault).unwrap());

        tracker.post(KeyboardNotification::WillShow, &show_event(250.0), &mut screens);

        assert_eq!(screens.screens[&login].inset, 250.0);
        assert_eq!(screens.screens[&vault].inset, 0.0);
        assert!(tracker.is_visible(&login));
        assert!(!tracker.is_visible(&vault));

        tracker.post(KeyboardNotification::WillHide, &hide_event(), &mut screens);
        assert_eq!(screens.screens[&login].inset, 0.0);
    }

    // Visibility is keyed by target while the inset lands on the owner's screen.
    #[test]
    fn owner_and_target_are_tracked_separately() {
        let mut tracker = KeyboardInsetTracker::new();
        let owner = ScreenId::new("container");
        let target = ScreenId::new("child");
        let mut screens = Screens::default();
        screens.screens.insert(owner.clone(), RecordingScreen::default());

        tracker.attach(&owner, &target);
        tracker.post(KeyboardNotification::WillShow, &show_event(200.0), &mut screens);

        assert!(tracker.is_visible(&target));
        assert!(!tracker.is_visible(&owner));
        assert_eq!(screens.screens[&owner].inset, 200.0);
    }

    #[test]
    fn curve_mapping_and_easing_bounds() {
        assert_eq!(AnimationCurve::from_raw(0), AnimationCurve::EaseInOut);
        assert_eq!(AnimationCurve::from_raw(3), AnimationCurve::Linear);
        assert_eq!(AnimationCurve::from_raw(7), AnimationCurve::Keyboard);

        for curve in [
            AnimationCurve::EaseInOut,
            AnimationCurve::EaseIn,
            AnimationCurve::EaseOut,
            AnimationCurve::Linear,
            AnimationCurve::Keyboard,
        ] {
            assert_eq!(curve.ease(0.0), 0.0);
            assert!((curve.ease(1.0) - 1.0).abs() < 1e-6);
            assert!((curve.ease(2.0) - 1.0).abs() < 1e-6);
        }
    }
}
