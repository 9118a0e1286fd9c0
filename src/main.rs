//! Kontho - Bengali text-to-speech in the terminal
//!
//! Sends text to the Gemini speech model, decodes the returned PCM, plays
//! it with a live frequency display and optionally saves it as WAV.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use kontho::app::App;
use kontho::audio::output::{CpalOutput, OutputBackend, SimulatedOutput};
use kontho::audio::PlaybackController;
use kontho::cli::Args;
use kontho::history::EntryId;
use kontho::params::{AnalyserConfig, VisualizerConfig};
use kontho::synthesis::{
    Emotion, GeminiClient, SpeechSynthesizer, SynthesisPayload, SynthesisRequest, Voice,
};
use kontho::visualizer::Visualizer;

/// Per-frame hook for backends that need to be driven from the loop
trait FrameClock {
    fn tick(&mut self, elapsed: Duration);
}

impl FrameClock for CpalOutput {
    fn tick(&mut self, _elapsed: Duration) {}
}

impl FrameClock for SimulatedOutput {
    fn tick(&mut self, elapsed: Duration) {
        self.advance(elapsed);
    }
}

fn setup_tracing() {
    use tracing_subscriber::fmt;

    // Logs go to stderr so the visualizer owns stdout
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn print_voices() {
    println!("Voices:");
    for voice in Voice::ALL {
        println!(
            "  {:<8} {}  - {}",
            voice.id().to_lowercase(),
            voice.display_name(),
            voice.description()
        );
    }
    println!("\nEmotions:");
    for emotion in Emotion::ALL {
        println!("  {:<8} {}", emotion.english_name().to_lowercase(), emotion.label());
    }
}

/// Play `id` and render the spectrum until playback returns to idle
fn play_with_visualizer<S, B>(app: &mut App<S, B>, id: &EntryId) -> Result<()>
where
    S: SpeechSynthesizer,
    B: OutputBackend + FrameClock,
{
    let config = VisualizerConfig::default();
    let interval = config.frame_interval();
    let width = config.bar_count;
    let mut visualizer = Visualizer::new(config);
    let mut stdout = io::stdout();

    app.play(id)?;
    let mut last = Instant::now();
    while app.player().is_playing() {
        thread::sleep(interval);

        let now = Instant::now();
        app.player_mut().backend_mut().tick(now - last);
        last = now;
        app.poll();

        let frame = visualizer.tick(app.player().is_playing(), app.player().analyser());
        write!(stdout, "\r{:<width$}", frame, width = width)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn run<B: OutputBackend + FrameClock>(args: &Args, backend: B) -> Result<()> {
    let player = PlaybackController::new(backend, AnalyserConfig::default())
        .map_err(anyhow::Error::msg)?;
    let mut app = App::new(GeminiClient::new(args.synthesis_config()), player);

    let text = args.input_text().map_err(anyhow::Error::msg)?;
    let request = SynthesisRequest::new(text, args.voice, args.emotion);

    let id = match &args.payload {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload {}", path.display()))?;
            let payload = SynthesisPayload {
                data,
                sample_rate: args.sample_rate,
                channels: args.channels,
            };
            app.ingest(request, &payload)?
        }
        None => {
            println!("তৈরি হচ্ছে... ({}, {})", args.voice.display_name(), args.emotion);
            app.synthesize(request)?
        }
    };

    if let Some(entry) = app.history().get(&id) {
        println!(
            "[{}] {} · {:.2}s @ {}Hz · {}",
            entry.created_at.with_timezone(&chrono::Local).format("%H:%M"),
            entry.id,
            entry.buffer.duration().as_secs_f32(),
            entry.buffer.sample_rate(),
            entry.voice.display_name()
        );
    }

    if let Some(dir) = &args.save {
        let path = app.export(&id, dir)?;
        println!("Saved {}", path.display());
    }

    if !args.no_play {
        play_with_visualizer(&mut app, &id)?;
    }

    info!("Done");
    Ok(())
}

fn main() {
    let args = Args::parse();
    setup_tracing();

    if args.list_voices {
        print_voices();
        return;
    }

    let result = if args.mute {
        run(&args, SimulatedOutput::new())
    } else {
        run(&args, CpalOutput::new())
    };

    if let Err(e) = result {
        eprintln!("ভুল হয়েছে: {:#}", e);
        std::process::exit(1);
    }
}
