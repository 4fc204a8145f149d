// Player controller: one shared backend, one visible surface, many tracks

use crate::config::{ControllerConfig, SeekGuard};
use crate::tracklist::{Track, Tracklist};
use playdeck_core::{
    format_clock, BackendEvent, MediaBackend, PlayerError, Result, SessionContainer, TrackState,
    UNKNOWN_CLOCK,
};
use std::time::Instant;

/// Keeps exactly one media backend in sync with exactly one visible control
/// surface
///
/// User intent (selection, transport, seek, volume) flows into the backend;
/// backend lifecycle events are forwarded by the host into
/// [`on_backend_event`](PlayerController::on_backend_event) and reflected
/// back onto the rendered controls. Hosts that enable the reveal fallback
/// also pump [`on_tick`](PlayerController::on_tick).
pub struct PlayerController {
    backend: Box<dyn MediaBackend>,
    tracks: Tracklist,
    session: SessionContainer,
    config: ControllerConfig,
}

impl PlayerController {
    pub fn new(backend: Box<dyn MediaBackend>, tracks: Tracklist) -> Self {
        Self::with_config(backend, tracks, ControllerConfig::default())
    }

    pub fn with_config(
        backend: Box<dyn MediaBackend>,
        tracks: Tracklist,
        config: ControllerConfig,
    ) -> Self {
        Self {
            backend,
            tracks,
            session: SessionContainer::new(),
            config,
        }
    }

    /// Shared handle onto the session record
    pub fn session(&self) -> SessionContainer {
        self.session.clone()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Activate a track, or stop it if it is already the active one
    ///
    /// Selecting a new track deactivates the previous one first: its trigger
    /// visual resets and its surface hides, so at most one surface is visible.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        let track = self
            .tracks
            .get(index)
            .ok_or(PlayerError::UnknownTrack(index))?
            .clone();

        if let Some(active) = self.session.active() {
            if active.index == index {
                return self.stop_active(index, &track);
            }
            self.deactivate(active.index);
            if self.config.halt_before_switch {
                self.backend.pause();
                if let Err(err) = self.backend.seek(0.0) {
                    log::debug!("rewind before switch rejected: {}", err);
                }
            }
        }

        self.start_track(index, &track)
    }

    /// Flip between playing and paused on the active track
    ///
    /// No-op when nothing is active.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        let Some(active) = self.session.active() else {
            return Ok(());
        };
        let Some(track) = self.tracks.get(active.index).cloned() else {
            return Ok(());
        };

        if self.backend.is_paused() {
            let played = match self.backend.play() {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("track {}: play request failed: {}", active.index, err);
                    false
                }
            };
            if played || !self.config.rollback_on_play_failure {
                track.trigger().set_playing(true);
                track.surface().set_playing(true);
                self.session.update(|s| {
                    if let Some(active) = s.active.as_mut() {
                        active.play_pending = true;
                    }
                });
                if matches!(active.state, TrackState::Ready | TrackState::Paused) {
                    self.session.transition(TrackState::Playing)?;
                }
            }
        } else {
            self.backend.pause();
            track.trigger().set_playing(false);
            track.surface().set_playing(false);
            self.session.update(|s| {
                if let Some(active) = s.active.as_mut() {
                    active.play_pending = false;
                }
            });
            if active.state == TrackState::Playing {
                self.session.transition(TrackState::Paused)?;
            }
        }
        Ok(())
    }

    /// Mark the start of a user seek drag
    ///
    /// While dragging, backend position events leave the seek control alone.
    pub fn seek_begin(&mut self) {
        self.session.update(|s| s.seeking = true);
    }

    /// Mark the end of a user seek drag
    pub fn seek_end(&mut self) {
        self.session.update(|s| s.seeking = false);
    }

    /// Seek to a percent of the duration, 0..=100
    ///
    /// How much readiness is required before the request reaches the backend
    /// is configured through [`SeekGuard`].
    pub fn seek_to(&mut self, percent: f64) -> Result<()> {
        if self.session.active().is_none() {
            return Ok(());
        }
        let percent = percent.clamp(0.0, 100.0);

        let duration = match self.config.seek_guard {
            SeekGuard::Strict => {
                if !self.backend.is_ready() {
                    log::debug!("seek ignored: backend not ready");
                    return Ok(());
                }
                match self.valid_duration() {
                    Some(duration) => duration,
                    None => {
                        log::debug!("seek ignored: duration unknown");
                        return Ok(());
                    }
                }
            }
            SeekGuard::DurationKnown => match self.valid_duration() {
                Some(duration) => duration,
                None => {
                    log::debug!("seek ignored: duration unknown");
                    return Ok(());
                }
            },
            SeekGuard::Unchecked => self.backend.duration().unwrap_or(0.0),
        };

        let target = percent / 100.0 * duration;
        self.apply_seek(target);
        Ok(())
    }

    /// Set the backend volume from a percent control value, 0..=100
    pub fn set_volume(&mut self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        self.backend.set_volume((percent / 100.0) as f32);
        if self.config.shared_volume {
            for track in self.tracks.iter() {
                track.surface().set_volume(percent);
            }
        }
    }

    /// Silence the backend, or restore the volume a previous mute saved
    ///
    /// The saved value defaults to maximum, so unmuting without a prior mute
    /// restores full volume.
    pub fn toggle_mute(&mut self) {
        let volume = self.backend.volume();
        if volume > 0.0 {
            self.session.update(|s| s.saved_volume = volume);
            self.backend.set_volume(0.0);
            self.write_volume_controls(0.0);
        } else {
            let restored = self.session.snapshot().saved_volume;
            self.backend.set_volume(restored);
            self.write_volume_controls(f64::from(restored) * 100.0);
        }
    }

    /// Apply one backend lifecycle event
    ///
    /// Events stamped with a superseded load epoch are dropped: the user has
    /// already moved on and the callback no longer has a surface to write to.
    pub fn on_backend_event(&mut self, event: BackendEvent) -> Result<()> {
        let Some(active) = self.session.active() else {
            log::debug!("dropping backend event with no active track: {:?}", event);
            return Ok(());
        };
        if event.epoch() != active.epoch {
            log::debug!(
                "dropping stale backend event {:?}, active epoch is {:?}",
                event,
                active.epoch
            );
            return Ok(());
        }
        let track = self
            .tracks
            .get(active.index)
            .ok_or(PlayerError::UnknownTrack(active.index))?
            .clone();

        match event {
            BackendEvent::PositionChanged { .. } => self.refresh_position(&track),
            BackendEvent::MetadataReady { .. }
            | BackendEvent::DurationKnown { .. }
            | BackendEvent::CanPlay { .. }
            | BackendEvent::CanPlayThrough { .. } => self.apply_readiness(&track)?,
            BackendEvent::BufferingProgress { .. } => self.refresh_loading_progress(&track),
            BackendEvent::Ended { .. } => self.finish_track(active.index, &track)?,
        }
        Ok(())
    }

    /// Fire the reveal fallback once its deadline has passed
    ///
    /// A surface whose backend never reports readiness is revealed anyway
    /// with an unknown-duration label instead of loading forever.
    pub fn on_tick(&mut self, now: Instant) -> Result<()> {
        let Some(active) = self.session.active() else {
            return Ok(());
        };
        let Some(deadline) = active.reveal_deadline else {
            return Ok(());
        };
        if now < deadline {
            return Ok(());
        }
        let Some(track) = self.tracks.get(active.index).cloned() else {
            return Ok(());
        };

        self.session.update(|s| {
            if let Some(active) = s.active.as_mut() {
                active.reveal_deadline = None;
                active.revealed = true;
            }
        });
        if !active.revealed {
            log::info!(
                "track {}: readiness overdue, force-revealing surface",
                active.index
            );
            track.surface().reveal();
            if !active.duration_known {
                track.surface().set_duration(UNKNOWN_CLOCK);
            }
            self.promote_after_reveal()?;
        }
        Ok(())
    }

    /// Stop the active track in place: rewind, reset visuals, clear the session
    fn stop_active(&mut self, index: usize, track: &Track) -> Result<()> {
        log::info!("track {}: reselected, stopping", index);
        self.backend.pause();
        if let Err(err) = self.backend.seek(0.0) {
            log::debug!("rewind on stop rejected: {}", err);
        }
        track.trigger().set_playing(false);
        track.surface().hide();
        self.session.clear_active();
        Ok(())
    }

    /// Reset the previously active track's visuals and drop its record
    fn deactivate(&mut self, index: usize) {
        if let Some(track) = self.tracks.get(index) {
            track.trigger().set_playing(false);
            track.surface().hide();
        }
        self.session.clear_active();
    }

    fn start_track(&mut self, index: usize, track: &Track) -> Result<()> {
        log::info!("track {}: selected ({})", index, track.url());
        track.surface().show_loading();
        track
            .surface()
            .set_volume(f64::from(self.backend.volume()) * 100.0);

        let epoch = self.backend.load(track.url());
        let deadline = self.config.reveal_fallback.map(|delay| Instant::now() + delay);
        self.session.activate(index, epoch, deadline)?;

        let played = match self.backend.play() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("track {}: play request failed: {}", index, err);
                false
            }
        };
        if played || !self.config.rollback_on_play_failure {
            track.trigger().set_playing(true);
            track.surface().set_playing(true);
            self.session.update(|s| {
                if let Some(active) = s.active.as_mut() {
                    active.play_pending = true;
                }
            });
        }
        Ok(())
    }

    fn valid_duration(&self) -> Option<f64> {
        self.backend
            .duration()
            .filter(|duration| duration.is_finite() && *duration > 0.0)
    }

    fn apply_seek(&mut self, target: f64) {
        if self.config.prefer_fast_seek && self.backend.fast_seek(target).is_ok() {
            return;
        }
        if let Err(err) = self.backend.seek(target) {
            log::debug!("seek to {:.2}s rejected: {}", target, err);
        }
    }

    fn write_volume_controls(&self, percent: f64) {
        if self.config.shared_volume {
            for track in self.tracks.iter() {
                track.surface().set_volume(percent);
            }
        } else if let Some(active) = self.session.active() {
            if let Some(track) = self.tracks.get(active.index) {
                track.surface().set_volume(percent);
            }
        }
    }

    /// Reflect the backend position into the seek control and elapsed label
    fn refresh_position(&mut self, track: &Track) {
        if self.session.snapshot().seeking {
            return;
        }
        let position = self.backend.position();
        let percent = match self.valid_duration() {
            Some(duration) => {
                let percent = position / duration * 100.0;
                if percent.is_finite() {
                    percent
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        track.surface().set_progress(percent);
        track.surface().set_elapsed(&format_clock(position));
    }

    /// Reveal the surface and publish the duration once it is trustworthy
    ///
    /// Metadata, duration, can-play, and can-play-through all land here, and
    /// any of them may fire more than once per load; every path is idempotent.
    fn apply_readiness(&mut self, track: &Track) -> Result<()> {
        let Some(duration) = self.valid_duration() else {
            return Ok(());
        };
        track.surface().reveal();
        track.surface().set_duration(&format_clock(duration));
        self.session.update(|s| {
            if let Some(active) = s.active.as_mut() {
                active.revealed = true;
                active.duration_known = true;
                active.reveal_deadline = None;
            }
        });
        self.promote_after_reveal()
    }

    /// Leave Loading once the surface is revealed
    fn promote_after_reveal(&mut self) -> Result<()> {
        let Some(active) = self.session.active() else {
            return Ok(());
        };
        if active.state == TrackState::Loading {
            self.session.transition(TrackState::Ready)?;
            if active.play_pending {
                self.session.transition(TrackState::Playing)?;
            }
        }
        Ok(())
    }

    fn refresh_loading_progress(&mut self, track: &Track) {
        if !self.config.loading_progress {
            return;
        }
        let (Some(buffered), Some(duration)) = (self.backend.buffered_to(), self.valid_duration())
        else {
            return;
        };
        let percent = (buffered / duration * 100.0).clamp(0.0, 100.0);
        track.surface().set_loading_progress(percent);
    }

    /// Advance to the next track in declaration order, or wind down
    fn finish_track(&mut self, index: usize, track: &Track) -> Result<()> {
        if let Some(next) = self.tracks.next_after(index) {
            log::info!("track {}: ended, advancing to track {}", index, next);
            return self.select_track(next);
        }

        log::info!("track {}: ended, end of tracklist", index);
        track.trigger().set_playing(false);
        track.surface().set_playing(false);
        track.surface().set_progress(0.0);
        track.surface().set_elapsed("0:00");
        self.session.clear_active();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControllerConfig, SeekGuard};
    use playdeck_backend_dev::{RecordingSurface, RecordingTrigger, ScriptedBackend, ScriptedHandle};
    use playdeck_core::{BackendEvent, TrackState};
    use std::sync::Arc;
    use std::time::Duration;

    struct Rig {
        controller: PlayerController,
        handle: ScriptedHandle,
        surfaces: Vec<Arc<RecordingSurface>>,
        triggers: Vec<Arc<RecordingTrigger>>,
    }

    fn rig_with(config: ControllerConfig) -> Rig {
        let backend = ScriptedBackend::new();
        let handle = backend.handle();
        let surfaces: Vec<_> = (0..3).map(|_| Arc::new(RecordingSurface::new())).collect();
        let triggers: Vec<_> = (0..3).map(|_| Arc::new(RecordingTrigger::new())).collect();
        let tracks = (0..3)
            .map(|i| {
                Track::new(
                    format!("track-{}.mp3", i),
                    triggers[i].clone(),
                    surfaces[i].clone(),
                )
            })
            .collect();
        Rig {
            controller: PlayerController::with_config(
                Box::new(backend),
                Tracklist::new(tracks),
                config,
            ),
            handle,
            surfaces,
            triggers,
        }
    }

    fn rig() -> Rig {
        rig_with(ControllerConfig::default())
    }

    /// Script a duration and deliver one readiness event for the active load
    fn make_ready(rig: &mut Rig, duration: f64) {
        rig.handle.set_duration(Some(duration));
        rig.handle.set_ready(true);
        let epoch = rig.handle.current_epoch();
        rig.controller
            .on_backend_event(BackendEvent::MetadataReady { epoch })
            .unwrap();
    }

    #[test]
    fn test_select_loads_and_plays() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();

        assert_eq!(rig.handle.url().as_deref(), Some("track-0.mp3"));
        assert!(!rig.handle.is_paused());
        assert!(rig.triggers[0].is_playing());
        let snap = rig.surfaces[0].snapshot();
        assert!(snap.visible);
        assert!(snap.loading);
        assert!(snap.playing);
        assert_eq!(
            rig.controller.session().active().unwrap().state,
            TrackState::Loading
        );
    }

    #[test]
    fn test_readiness_reveals_and_promotes() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 200.0);

        let snap = rig.surfaces[0].snapshot();
        assert!(snap.visible);
        assert!(!snap.loading);
        assert_eq!(snap.duration, "3:20");
        assert_eq!(
            rig.controller.session().active().unwrap().state,
            TrackState::Playing
        );
    }

    #[test]
    fn test_selecting_other_track_deactivates_previous() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 100.0);

        rig.controller.select_track(1).unwrap();

        assert!(!rig.triggers[0].is_playing());
        assert!(!rig.surfaces[0].snapshot().visible);
        assert!(rig.triggers[1].is_playing());
        assert_eq!(rig.handle.url().as_deref(), Some("track-1.mp3"));

        let active = rig.controller.session().active().unwrap();
        assert_eq!(active.index, 1);
        assert_eq!(active.state, TrackState::Loading);
    }

    #[test]
    fn test_reselect_active_track_stops_it() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 100.0);
        rig.handle.set_position(42.0);

        rig.controller.select_track(0).unwrap();

        assert!(rig.handle.is_paused());
        assert_eq!(rig.handle.position(), 0.0);
        assert!(!rig.triggers[0].is_playing());
        assert!(!rig.surfaces[0].snapshot().visible);
        assert!(rig.controller.session().active().is_none());
    }

    #[test]
    fn test_toggle_play_pause_roundtrip() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 100.0);

        rig.controller.toggle_play_pause().unwrap();
        assert!(rig.handle.is_paused());
        assert!(!rig.triggers[0].is_playing());
        assert!(!rig.surfaces[0].snapshot().playing);
        assert_eq!(
            rig.controller.session().active().unwrap().state,
            TrackState::Paused
        );

        rig.controller.toggle_play_pause().unwrap();
        assert!(!rig.handle.is_paused());
        assert!(rig.triggers[0].is_playing());
        assert_eq!(
            rig.controller.session().active().unwrap().state,
            TrackState::Playing
        );
    }

    #[test]
    fn test_toggle_without_selection_is_noop() {
        let mut rig = rig();
        rig.controller.toggle_play_pause().unwrap();
        assert!(rig.handle.is_paused());
        assert!(rig.controller.session().active().is_none());
    }

    #[test]
    fn test_seek_converts_percent_to_seconds() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 200.0);

        rig.controller.seek_to(50.0).unwrap();
        assert_eq!(rig.handle.position(), 100.0);
        assert_eq!(rig.handle.seeks(), vec![100.0]);
    }

    #[test]
    fn test_seek_ignored_while_duration_unknown() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();

        rig.controller.seek_to(50.0).unwrap();
        assert!(rig.handle.seeks().is_empty());
        assert!(rig.handle.fast_seeks().is_empty());
    }

    #[test]
    fn test_strict_seek_guard_requires_readiness() {
        let mut rig = rig_with(ControllerConfig {
            seek_guard: SeekGuard::Strict,
            ..ControllerConfig::default()
        });
        rig.controller.select_track(0).unwrap();
        rig.handle.set_duration(Some(100.0));

        rig.controller.seek_to(10.0).unwrap();
        assert!(rig.handle.seeks().is_empty());

        rig.handle.set_ready(true);
        rig.controller.seek_to(10.0).unwrap();
        assert_eq!(rig.handle.seeks(), vec![10.0]);
    }

    #[test]
    fn test_fast_seek_preferred_with_fallback() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 100.0);

        rig.handle.support_fast_seek(true);
        rig.controller.seek_to(25.0).unwrap();
        assert_eq!(rig.handle.fast_seeks(), vec![25.0]);
        assert!(rig.handle.seeks().is_empty());

        rig.handle.support_fast_seek(false);
        rig.controller.seek_to(50.0).unwrap();
        assert_eq!(rig.handle.seeks(), vec![50.0]);
    }

    #[test]
    fn test_position_events_write_progress_and_clock() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 200.0);
        let epoch = rig.handle.current_epoch();

        rig.handle.set_position(50.0);
        rig.controller
            .on_backend_event(BackendEvent::PositionChanged { epoch })
            .unwrap();

        let snap = rig.surfaces[0].snapshot();
        assert_eq!(snap.progress, 25.0);
        assert_eq!(snap.elapsed, "0:50");
    }

    #[test]
    fn test_position_percent_guards_unknown_duration() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        let epoch = rig.handle.current_epoch();

        rig.handle.set_position(50.0);
        rig.controller
            .on_backend_event(BackendEvent::PositionChanged { epoch })
            .unwrap();

        let snap = rig.surfaces[0].snapshot();
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.elapsed, "0:50");
    }

    #[test]
    fn test_seek_drag_suppresses_position_updates() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 200.0);
        let epoch = rig.handle.current_epoch();

        rig.controller.seek_begin();
        rig.handle.set_position(100.0);
        rig.controller
            .on_backend_event(BackendEvent::PositionChanged { epoch })
            .unwrap();
        assert_eq!(rig.surfaces[0].snapshot().progress, 0.0);

        rig.controller.seek_end();
        rig.controller
            .on_backend_event(BackendEvent::PositionChanged { epoch })
            .unwrap();
        assert_eq!(rig.surfaces[0].snapshot().progress, 50.0);
    }

    #[test]
    fn test_mute_restores_exact_previous_volume() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        rig.controller.set_volume(40.0);
        assert_eq!(rig.handle.volume(), 0.4);

        rig.controller.toggle_mute();
        assert_eq!(rig.handle.volume(), 0.0);
        assert_eq!(rig.surfaces[0].snapshot().volume, 0.0);

        rig.controller.toggle_mute();
        assert_eq!(rig.handle.volume(), 0.4);
        // The restored slider value survives the backend's f32 roundtrip
        assert!((rig.surfaces[0].snapshot().volume - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_mute_at_zero_keeps_saved_volume() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        rig.controller.set_volume(60.0);
        rig.controller.toggle_mute();
        assert_eq!(
            rig.controller.session().snapshot().saved_volume,
            0.6
        );

        // Already muted: toggling restores rather than saving the zero
        rig.controller.toggle_mute();
        assert_eq!(rig.handle.volume(), 0.6);
        assert_eq!(
            rig.controller.session().snapshot().saved_volume,
            0.6
        );
    }

    #[test]
    fn test_unmute_without_prior_mute_restores_maximum() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        rig.controller.set_volume(0.0);

        rig.controller.toggle_mute();
        assert_eq!(rig.handle.volume(), 1.0);
    }

    #[test]
    fn test_shared_volume_fans_out_to_all_surfaces() {
        let mut rig = rig_with(ControllerConfig {
            shared_volume: true,
            ..ControllerConfig::default()
        });
        rig.controller.select_track(0).unwrap();
        rig.controller.set_volume(30.0);

        for surface in &rig.surfaces {
            assert_eq!(surface.snapshot().volume, 30.0);
        }
    }

    #[test]
    fn test_ended_advances_in_declaration_order() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 100.0);
        let epoch = rig.handle.current_epoch();

        rig.controller
            .on_backend_event(BackendEvent::Ended { epoch })
            .unwrap();

        assert!(!rig.triggers[0].is_playing());
        assert!(!rig.surfaces[0].snapshot().visible);
        assert!(rig.triggers[1].is_playing());
        assert_eq!(rig.handle.url().as_deref(), Some("track-1.mp3"));
        assert_eq!(rig.controller.session().active().unwrap().index, 1);
    }

    #[test]
    fn test_ended_on_last_track_winds_down() {
        let mut rig = rig();
        rig.controller.select_track(2).unwrap();
        make_ready(&mut rig, 100.0);
        let epoch = rig.handle.current_epoch();
        rig.handle.set_position(100.0);

        rig.controller
            .on_backend_event(BackendEvent::Ended { epoch })
            .unwrap();

        assert!(rig.controller.session().active().is_none());
        assert!(!rig.triggers[2].is_playing());
        let snap = rig.surfaces[2].snapshot();
        assert!(!snap.playing);
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.elapsed, "0:00");
        // The finished surface stays mounted
        assert!(snap.visible);
    }

    #[test]
    fn test_repeated_readiness_is_idempotent() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        rig.handle.set_duration(Some(125.0));
        rig.handle.set_ready(true);
        let epoch = rig.handle.current_epoch();

        for event in [
            BackendEvent::MetadataReady { epoch },
            BackendEvent::DurationKnown { epoch },
            BackendEvent::CanPlay { epoch },
            BackendEvent::CanPlayThrough { epoch },
        ] {
            rig.controller.on_backend_event(event).unwrap();
        }

        let snap = rig.surfaces[0].snapshot();
        assert_eq!(snap.duration, "2:05");
        assert!(snap.duration_writes.iter().all(|label| label == "2:05"));
        assert_eq!(
            rig.controller.session().active().unwrap().state,
            TrackState::Playing
        );
    }

    #[test]
    fn test_stale_epoch_events_are_dropped() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        let stale = rig.handle.current_epoch();

        rig.controller.select_track(1).unwrap();
        rig.handle.set_duration(Some(100.0));

        rig.controller
            .on_backend_event(BackendEvent::Ended { epoch: stale })
            .unwrap();
        rig.controller
            .on_backend_event(BackendEvent::MetadataReady { epoch: stale })
            .unwrap();

        // Still loading track 1, untouched by track 0's stragglers
        let active = rig.controller.session().active().unwrap();
        assert_eq!(active.index, 1);
        assert_eq!(active.state, TrackState::Loading);
        assert!(rig.surfaces[1].snapshot().loading);
    }

    #[test]
    fn test_play_failure_is_caught_and_logged() {
        let mut rig = rig();
        rig.handle.reject_play(true);

        rig.controller.select_track(0).unwrap();

        assert!(rig.handle.is_paused());
        // Source behavior: visuals are not rolled back by default
        assert!(rig.triggers[0].is_playing());
        assert!(rig.surfaces[0].snapshot().playing);
    }

    #[test]
    fn test_play_failure_rollback_when_configured() {
        let mut rig = rig_with(ControllerConfig {
            rollback_on_play_failure: true,
            ..ControllerConfig::default()
        });
        rig.handle.reject_play(true);

        rig.controller.select_track(0).unwrap();

        assert!(rig.handle.is_paused());
        assert!(!rig.triggers[0].is_playing());
        assert!(!rig.surfaces[0].snapshot().playing);
        assert!(!rig.controller.session().active().unwrap().play_pending);
    }

    #[test]
    fn test_loading_progress_renders_buffered_share() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        rig.handle.set_duration(Some(200.0));
        rig.handle.set_buffered_to(Some(50.0));
        let epoch = rig.handle.current_epoch();

        rig.controller
            .on_backend_event(BackendEvent::BufferingProgress { epoch })
            .unwrap();
        assert_eq!(rig.surfaces[0].snapshot().loading_progress, 25.0);
    }

    #[test]
    fn test_reveal_fallback_fires_after_deadline() {
        let mut rig = rig_with(ControllerConfig {
            reveal_fallback: Some(Duration::from_millis(3000)),
            ..ControllerConfig::default()
        });
        rig.controller.select_track(0).unwrap();

        let deadline = rig
            .controller
            .session()
            .active()
            .unwrap()
            .reveal_deadline
            .unwrap();

        rig.controller
            .on_tick(deadline - Duration::from_millis(1))
            .unwrap();
        assert!(rig.surfaces[0].snapshot().loading);

        rig.controller.on_tick(deadline).unwrap();
        let snap = rig.surfaces[0].snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.duration, "--:--");
        assert_eq!(
            rig.controller.session().active().unwrap().state,
            TrackState::Playing
        );

        // A late real duration upgrades the degraded label in place
        make_ready(&mut rig, 100.0);
        assert_eq!(rig.surfaces[0].snapshot().duration, "1:40");
    }

    #[test]
    fn test_readiness_cancels_reveal_fallback() {
        let mut rig = rig();
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 100.0);

        let active = rig.controller.session().active().unwrap();
        assert!(active.reveal_deadline.is_none());
        assert_eq!(rig.surfaces[0].snapshot().duration, "1:40");
    }

    #[test]
    fn test_unknown_track_index_is_rejected() {
        let mut rig = rig();
        assert_eq!(
            rig.controller.select_track(9),
            Err(PlayerError::UnknownTrack(9))
        );
    }

    #[test]
    fn test_halt_before_switch_rewinds_old_resource() {
        let mut rig = rig_with(ControllerConfig {
            halt_before_switch: true,
            ..ControllerConfig::default()
        });
        rig.controller.select_track(0).unwrap();
        make_ready(&mut rig, 100.0);
        rig.handle.set_position(42.0);

        rig.controller.select_track(1).unwrap();

        // The rewind targeted the old resource before the new load reset it
        assert_eq!(rig.handle.seeks(), vec![0.0]);
        assert_eq!(rig.handle.url().as_deref(), Some("track-1.mp3"));
    }
}
