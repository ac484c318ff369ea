//! Sound cues driven by session events
//!
//! The simulation never touches audio. Collaborators drain
//! [`GameEvent`]s and translate them into [`AudioCue`]s; on the web those
//! cues drive procedurally generated Web Audio voices.

use crate::sim::GameEvent;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tiny plip when the player presses
    Tap,
    /// Soft pop when the run ends
    Pop,
}

/// What the audio backend should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Play(SoundEffect),
    /// Begin the sustained inflate whoosh
    StartInflate,
    /// Fade out the inflate whoosh, if playing
    StopInflate,
}

/// Cues for one event, in playback order
pub fn cues_for(event: &GameEvent) -> &'static [AudioCue] {
    match event {
        GameEvent::GrowStarted => &[AudioCue::Play(SoundEffect::Tap), AudioCue::StartInflate],
        GameEvent::GrowStopped => &[AudioCue::StopInflate],
        GameEvent::Terminal(_) => &[AudioCue::StopInflate, AudioCue::Play(SoundEffect::Pop)],
        GameEvent::ScoreChanged { .. } | GameEvent::NewBest(_) => &[],
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{AudioManager, InflateVoice};

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioContext, BiquadFilterNode, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
    };

    use super::{AudioCue, SoundEffect, cues_for};
    use crate::sim::GameEvent;

    /// A running inflate sound. Owned by the manager; `stop` consumes it.
    pub struct InflateVoice {
        osc: OscillatorNode,
        gain: GainNode,
        _filter: BiquadFilterNode,
    }

    impl InflateVoice {
        /// Gentle low-passed sine that settles at 150 Hz
        pub fn start(ctx: &AudioContext, vol: f32) -> Option<Self> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            let filter = ctx.create_biquad_filter().ok()?;
            let t = ctx.current_time();

            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value_at_time(200.0, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(150.0, t + 0.1)
                .ok()?;
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(800.0);
            gain.gain().set_value_at_time(0.0, t).ok()?;
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.1, t + 0.05)
                .ok()?;

            osc.connect_with_audio_node(&filter).ok()?;
            filter.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            osc.start().ok()?;

            Some(Self {
                osc,
                gain,
                _filter: filter,
            })
        }

        /// Fade out over 100 ms and release the oscillator
        pub fn stop(self, ctx: &AudioContext) {
            let t = ctx.current_time();
            self.gain
                .gain()
                .linear_ramp_to_value_at_time(0.0, t + 0.1)
                .ok();
            self.osc.stop_with_when(t + 0.1).ok();
        }
    }

    /// Output level for every voice
    const VOLUME: f32 = 0.8;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        inflate: Option<InflateVoice>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        /// Context creation is deferred until the first user gesture
        pub fn new() -> Self {
            Self {
                ctx: None,
                inflate: None,
            }
        }

        /// Create or resume the context (call from an input handler)
        pub fn resume(&mut self) {
            if self.ctx.is_none() {
                self.ctx = AudioContext::new().ok();
                if self.ctx.is_none() {
                    log::warn!("Failed to create AudioContext - audio disabled");
                }
            }
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// React to one session event
        pub fn handle(&mut self, event: &GameEvent) {
            for cue in cues_for(event) {
                match *cue {
                    AudioCue::Play(effect) => self.play(effect),
                    AudioCue::StartInflate => self.start_inflate(),
                    AudioCue::StopInflate => self.stop_inflate(),
                }
            }
        }

        fn start_inflate(&mut self) {
            if self.inflate.is_some() {
                return;
            }
            if let Some(ctx) = &self.ctx {
                self.inflate = InflateVoice::start(ctx, VOLUME);
            }
        }

        fn stop_inflate(&mut self) {
            if let (Some(ctx), Some(voice)) = (&self.ctx, self.inflate.take()) {
                voice.stop(ctx);
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            let Some(ctx) = &self.ctx else { return };
            match effect {
                SoundEffect::Tap => self.play_tap(ctx, VOLUME),
                SoundEffect::Pop => self.play_pop(ctx, VOLUME),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Tap - 800 Hz falling to 400 Hz
        fn play_tap(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(400.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Pop - low-passed square dropping to 50 Hz
        fn play_pop(&self, ctx: &AudioContext, vol: f32) {
            let (Ok(osc), Ok(gain), Ok(filter)) = (
                ctx.create_oscillator(),
                ctx.create_gain(),
                ctx.create_biquad_filter(),
            ) else {
                return;
            };
            let t = ctx.current_time();

            osc.set_type(OscillatorType::Square);
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                .ok();
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(500.0);
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();

            if osc.connect_with_audio_node(&filter).is_err()
                || filter.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }
}
