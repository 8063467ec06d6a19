use gpui::{App, Application, Context, Render, Window, WindowOptions, div, prelude::*};
use gpui_mpv_player::{MediaState, Video, video};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use url::Url;

struct WithControlsExample {
    video: Video,
    last_click: Option<Instant>,
}

impl WithControlsExample {
    fn new(video: Video) -> Self {
        Self {
            video,
            last_click: None,
        }
    }

    fn click_allowed(&mut self) -> bool {
        let now = Instant::now();
        if let Some(prev) = self.last_click {
            if now.saturating_duration_since(prev) < Duration::from_millis(250) {
                return false;
            }
        }
        self.last_click = Some(now);
        true
    }

    fn seek_by(&mut self, forward: bool) {
        let pos = self.video.position();
        let step = Duration::from_secs(5);
        let target = if forward {
            pos.saturating_add(step).min(self.video.duration())
        } else {
            pos.saturating_sub(step)
        };
        if let Err(err) = self.video.seek(target, false) {
            log::warn!("seek failed: {err}");
        }
    }
}

fn control(id: &'static str, label: impl Into<String>) -> gpui::Stateful<gpui::Div> {
    div()
        .id(id)
        .px_6()
        .py_3()
        .border_1()
        .cursor_pointer()
        .child(label.into())
}

impl Render for WithControlsExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let play_label = if self.video.paused() || self.video.eos() {
            "▶️ Play"
        } else {
            "⏸️ Pause"
        };
        let status = match self.video.state() {
            MediaState::Opening => "opening".to_string(),
            MediaState::Opened => format!(
                "{:.1}s / {:.1}s",
                self.video.position().as_secs_f64(),
                self.video.duration().as_secs_f64()
            ),
            MediaState::Ended => "ended".to_string(),
            MediaState::Failed => "failed".to_string(),
            MediaState::Closed => "closed".to_string(),
        };

        let back_5s = control("btn-back-5s", "⏪ 5s").on_click(cx.listener(
            |this: &mut Self, _event, _window, cx| {
                if !this.click_allowed() {
                    return;
                }
                this.seek_by(false);
                cx.notify();
            },
        ));

        let play_pause = control("btn-play-pause", play_label).on_click(cx.listener(
            |this: &mut Self, _event, _window, cx| {
                if !this.click_allowed() {
                    return;
                }
                let paused = this.video.paused() || this.video.eos();
                if let Err(err) = this.video.set_paused(!paused) {
                    log::warn!("toggle pause failed: {err}");
                }
                cx.notify();
            },
        ));

        let stop = control("btn-stop", "⏹️ Stop").on_click(cx.listener(
            |this: &mut Self, _event, _window, cx| {
                if let Err(err) = this.video.stop() {
                    log::warn!("stop failed: {err}");
                }
                cx.notify();
            },
        ));

        let forward_5s = control("btn-forward-5s", "5s ⏩").on_click(cx.listener(
            |this: &mut Self, _event, _window, cx| {
                if !this.click_allowed() {
                    return;
                }
                this.seek_by(true);
                cx.notify();
            },
        ));

        div()
            .size_full()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .gap_3()
            .child(video(self.video.clone()).id("controlled-video"))
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_3()
                    .child(back_5s)
                    .child(play_pause)
                    .child(stop)
                    .child(forward_5s)
                    .child(status),
            )
    }
}

fn main() {
    env_logger::init();
    Application::new().run(|cx: &mut App| {
        let path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/test3.mp4"));
        let uri = Url::from_file_path(path.canonicalize().unwrap_or(path))
            .expect("invalid file path");

        let _ = cx.open_window(
            WindowOptions {
                focus: true,
                ..Default::default()
            },
            |_, cx| {
                let video = Video::new(&uri).expect("failed to create video");
                if let Err(err) = video.set_looping(true) {
                    log::warn!("looping unavailable: {err}");
                }
                cx.new(|_| WithControlsExample::new(video))
            },
        );
        cx.activate(true);
    });
}
