//! Simulated button walkthrough, no hardware or network required.
//!
//! Run with: cargo run --example simulated_button

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bentv_ui::{
    ButtonInput, CameraControl, Config, DisplayFrame, FitDetector, InputLevel, PollScheduler,
    Result, StatusDisplay, StatusReport,
};

/// Button that holds each scripted level for a fixed number of ticks.
struct SimulatedButton {
    script: Vec<(InputLevel, u32)>,
    position: usize,
    remaining: u32,
}

impl SimulatedButton {
    fn new(script: Vec<(InputLevel, u32)>) -> Self {
        let remaining = script.first().map(|&(_, n)| n).unwrap_or(0);
        Self {
            script,
            position: 0,
            remaining,
        }
    }
}

impl ButtonInput for SimulatedButton {
    fn read_level(&mut self) -> InputLevel {
        if self.remaining == 0 && self.position + 1 < self.script.len() {
            self.position += 1;
            self.remaining = self.script[self.position].1;
        }
        let (level, _) = self.script[self.position];
        self.remaining = self.remaining.saturating_sub(1);
        level
    }
}

struct LoggingCamera;

#[async_trait]
impl CameraControl for LoggingCamera {
    async fn move_to_preset(&self, preset: u8) -> Result<()> {
        println!(">>> camera move to preset {preset}");
        Ok(())
    }
}

struct CannedDetector;

#[async_trait]
impl FitDetector for CannedDetector {
    async fn fetch_status(&self) -> Result<StatusReport> {
        Ok(StatusReport {
            alarm_state: 0,
            spec_power: 100,
            roi_power: 150,
            alarm_thresh: 50,
            alarm_ratio_thresh: 10,
            alarm_phrase: "ok".to_string(),
            data_time: "12:00:00".to_string(),
        })
    }

    async fn set_background(&self) -> Result<()> {
        println!(">>> detector capturing new background");
        Ok(())
    }
}

/// Prints each frame as plain text instead of painting a terminal area.
struct PrintDisplay;

impl StatusDisplay for PrintDisplay {
    fn render(&mut self, frame: &DisplayFrame) -> Result<()> {
        println!(
            "[{:?}] {} | {} (bar {}%)",
            frame.background, frame.line1, frame.line2, frame.bar_percent
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Idle, a short press (3 ticks = 600 ms), idle, a long press (6 ticks),
    // then idle forever.
    let script = vec![
        (InputLevel::High, 10),
        (InputLevel::Low, 3),
        (InputLevel::High, 10),
        (InputLevel::Low, 6),
        (InputLevel::High, u32::MAX),
    ];

    let mut scheduler = PollScheduler::new(
        &Config::default(),
        SimulatedButton::new(script),
        LoggingCamera,
        CannedDetector,
        PrintDisplay,
        "Host: demo, IP: 127.0.0.1  ".to_string(),
        Instant::now(),
    );

    println!("running 60 simulated ticks (~12 s of appliance time)...");
    let mut now = Instant::now();
    for _ in 0..60 {
        scheduler.tick(now).await;
        now += Duration::from_millis(200);
    }
    println!("done; final mode: {:?}", scheduler.ui().mode());
}
