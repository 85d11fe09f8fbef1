use crate::constants::{FINALE_TRACK, FINALE_TRACK_VOLUME, SILENCE_GAIN};
use crate::events::Listener;
use guardian_core::{Cue, DroneVoice, Ramp, Tone, Waveform, AMBIENCE};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn js_err(what: &str, e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{} error: {:?}", what, e)
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx).map_err(|e| js_err("GainNode", e))?;
    g.gain().set_value(value);
    Ok(g)
}

fn create_osc(
    audio_ctx: &web::AudioContext,
    waveform: Waveform,
    hz: f32,
) -> anyhow::Result<web::OscillatorNode> {
    let osc = web::OscillatorNode::new(audio_ctx).map_err(|e| js_err("OscillatorNode", e))?;
    osc.set_type(match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    });
    osc.frequency().set_value(hz);
    Ok(osc)
}

fn ramp(param: &web::AudioParam, shape: Ramp, value: f32, at: f64) {
    _ = match shape {
        Ramp::Linear => param.linear_ramp_to_value_at_time(value, at),
        Ramp::Exponential => param.exponential_ramp_to_value_at_time(value.max(SILENCE_GAIN), at),
    };
}

/// Schedule one envelope'd oscillator; the node graph is released by the
/// browser once the oscillator stops.
fn trigger_tone(audio_ctx: &web::AudioContext, tone: &Tone, now: f64) -> anyhow::Result<()> {
    let start = now + tone.offset_sec;
    let osc = create_osc(audio_ctx, tone.waveform, tone.freq_start_hz)?;
    _ = osc.frequency().set_value_at_time(tone.freq_start_hz, start);
    if tone.freq_end_hz != tone.freq_start_hz {
        ramp(&osc.frequency(), tone.glide, tone.freq_end_hz, now + tone.glide_sec);
    }
    let g = create_gain(audio_ctx, tone.gain)?;
    _ = g.gain().set_value_at_time(tone.gain, start);
    let silent = match tone.release {
        Ramp::Linear => 0.0,
        Ramp::Exponential => SILENCE_GAIN,
    };
    ramp(&g.gain(), tone.release, silent, now + tone.release_sec);

    _ = osc.connect_with_audio_node(&g);
    _ = g.connect_with_audio_node(&audio_ctx.destination());
    _ = osc.start_with_when(start);
    _ = osc.stop_with_when(now + tone.stop_sec);
    Ok(())
}

struct DroneNodes {
    osc: web::OscillatorNode,
    gain: web::GainNode,
    lfo: Option<(web::OscillatorNode, web::GainNode)>,
}

impl DroneNodes {
    fn build(audio_ctx: &web::AudioContext, voice: &DroneVoice) -> anyhow::Result<Self> {
        let osc = create_osc(audio_ctx, Waveform::Sine, voice.freq_hz)?;
        let gain = create_gain(audio_ctx, voice.gain)?;
        _ = osc.connect_with_audio_node(&gain);
        _ = gain.connect_with_audio_node(&audio_ctx.destination());

        let lfo = match voice.lfo {
            Some((rate_hz, depth)) => {
                let lfo_osc = create_osc(audio_ctx, Waveform::Sine, rate_hz)?;
                let lfo_gain = create_gain(audio_ctx, depth)?;
                _ = lfo_osc.connect_with_audio_node(&lfo_gain);
                _ = lfo_gain.connect_with_audio_param(&gain.gain());
                _ = lfo_osc.start();
                Some((lfo_osc, lfo_gain))
            }
            None => None,
        };
        _ = osc.start();
        Ok(Self { osc, gain, lfo })
    }

    fn stop(self) {
        _ = self.osc.stop();
        _ = self.osc.disconnect();
        _ = self.gain.disconnect();
        if let Some((lfo_osc, lfo_gain)) = self.lfo {
            _ = lfo_osc.stop();
            _ = lfo_osc.disconnect();
            _ = lfo_gain.disconnect();
        }
    }
}

/// Lazily created WebAudio output for cues and the ambience drone.
///
/// The context is only created on first use so that it is born inside a user
/// gesture where possible; a suspended context is resumed on every use.
#[derive(Default)]
pub struct AudioOutput {
    ctx: Option<web::AudioContext>,
    drone: Vec<DroneNodes>,
}

impl AudioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_started(&mut self) -> anyhow::Result<web::AudioContext> {
        let ctx = match &self.ctx {
            Some(ctx) => ctx.clone(),
            None => {
                let ctx = web::AudioContext::new().map_err(|e| js_err("AudioContext", e))?;
                log::info!("[audio] context created");
                self.ctx = Some(ctx.clone());
                ctx
            }
        };
        if ctx.state() == web::AudioContextState::Suspended {
            _ = ctx.resume();
        }
        Ok(ctx)
    }

    pub fn play(&mut self, cue: Cue) {
        let ctx = match self.ensure_started() {
            Ok(ctx) => ctx,
            Err(e) => {
                log::warn!("[audio] {:?} skipped: {:?}", cue, e);
                return;
            }
        };
        let now = ctx.current_time();
        for tone in cue.tones() {
            if let Err(e) = trigger_tone(&ctx, tone, now) {
                log::warn!("[audio] {:?}: {:?}", cue, e);
                return;
            }
        }
    }

    pub fn ambience_running(&self) -> bool {
        !self.drone.is_empty()
    }

    /// Start or stop the drone. Repeated calls with the same value are no-ops.
    pub fn set_ambience(&mut self, on: bool) {
        if on == self.ambience_running() {
            return;
        }
        if !on {
            for nodes in self.drone.drain(..) {
                nodes.stop();
            }
            log::info!("[audio] ambience off");
            return;
        }
        let result = self.ensure_started().and_then(|ctx| {
            AMBIENCE
                .iter()
                .map(|voice| DroneNodes::build(&ctx, voice))
                .collect::<anyhow::Result<Vec<_>>>()
        });
        match result {
            Ok(nodes) => {
                self.drone = nodes;
                log::info!("[audio] ambience on");
            }
            Err(e) => log::warn!("[audio] ambience unavailable: {:?}", e),
        }
    }

    pub fn close(&mut self) {
        self.set_ambience(false);
        if let Some(ctx) = self.ctx.take() {
            _ = ctx.close();
        }
    }
}

/// The looping finale track. `playing` follows the element's actual playback
/// so the visualizer only runs while sound is audible.
pub struct FinaleMusic {
    el: web::HtmlAudioElement,
    playing: Rc<Cell<bool>>,
    _listeners: Vec<Listener>,
}

impl FinaleMusic {
    pub fn new() -> anyhow::Result<Self> {
        let el = web::HtmlAudioElement::new_with_src(FINALE_TRACK)
            .map_err(|e| js_err("HtmlAudioElement", e))?;
        el.set_loop(true);
        el.set_volume(FINALE_TRACK_VOLUME);

        let playing = Rc::new(Cell::new(false));
        let mut listeners = Vec::with_capacity(4);
        for (kind, state) in [
            ("playing", true),
            ("pause", false),
            ("ended", false),
            ("error", false),
        ] {
            let flag = playing.clone();
            listeners.push(Listener::new(&el, kind, move |_| flag.set(state)));
        }
        Ok(Self {
            el,
            playing,
            _listeners: listeners,
        })
    }

    pub fn playing_flag(&self) -> Rc<Cell<bool>> {
        self.playing.clone()
    }

    /// Start playback; autoplay refusal is logged, not fatal.
    pub fn play(&self) {
        match self.el.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[audio] finale track blocked: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] finale track failed: {:?}", e),
        }
    }
}

impl Drop for FinaleMusic {
    fn drop(&mut self) {
        _ = self.el.pause();
        self.el.set_current_time(0.0);
        self.playing.set(false);
    }
}
