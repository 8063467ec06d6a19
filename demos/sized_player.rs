use gpui::{
    App, Application, Context, Entity, Render, Window, WindowOptions, div, prelude::*, px, rgb,
};
use gpui_mpv_player::{
    ContentFit, PlayerOptions, VideoPlayer, VideoPlayerEvent, VideoPlayerView, video_player,
};
use std::path::PathBuf;
use url::Url;

const FITS: [ContentFit; 5] = [
    ContentFit::Contain,
    ContentFit::Cover,
    ContentFit::Fill,
    ContentFit::ScaleDown,
    ContentFit::None,
];

const SIZES: [(Option<f32>, Option<f32>); 5] = [
    (Some(800.0), Some(600.0)),
    (Some(400.0), Some(300.0)),
    (Some(600.0), None),
    (None, Some(400.0)),
    (None, None),
];

struct SizedPlayerExample {
    player: Entity<VideoPlayerView>,
    fit: usize,
    size: usize,
    status: String,
}

impl SizedPlayerExample {
    fn new(player: Entity<VideoPlayerView>, cx: &mut Context<Self>) -> Self {
        cx.subscribe(&player, |this, _, event: &VideoPlayerEvent, cx| {
            let status = match event {
                VideoPlayerEvent::MediaOpened {
                    width,
                    height,
                    duration,
                } => format!("{width}x{height}, {:.1}s", duration.as_secs_f64()),
                VideoPlayerEvent::MediaEnded => "ended".to_string(),
                VideoPlayerEvent::MediaFailed(message) => format!("failed: {message}"),
                VideoPlayerEvent::NewFrame => return,
            };
            this.status = status;
            cx.notify();
        })
        .detach();

        Self {
            player,
            fit: 0,
            size: 0,
            status: "opening".to_string(),
        }
    }

    fn update_player(&mut self, cx: &mut Context<Self>) {
        let fit = FITS[self.fit];
        let (width, height) = SIZES[self.size];

        self.player.update(cx, |view, cx| {
            let video = view.player().video().clone();
            let mut player = VideoPlayer::from_video(video).content_fit(fit);
            if let Some(w) = width {
                player = player.width(px(w));
            }
            if let Some(h) = height {
                player = player.height(px(h));
            }
            view.set_player(player);
            cx.notify();
        });
    }

    fn button(&self, id: &'static str, label: String) -> gpui::Stateful<gpui::Div> {
        div()
            .id(id)
            .px_3()
            .py_2()
            .bg(rgb(0x404040))
            .rounded_md()
            .cursor_pointer()
            .child(label)
    }
}

impl Render for SizedPlayerExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let size_text = match SIZES[self.size] {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            (Some(w), None) => format!("{w}x?"),
            (None, Some(h)) => format!("?x{h}"),
            (None, None) => "Natural".to_string(),
        };

        div()
            .size_full()
            .bg(rgb(0x2d2d2d))
            .flex()
            .flex_col()
            .child(
                div()
                    .h(px(60.0))
                    .w_full()
                    .bg(rgb(0x1e1e1e))
                    .flex()
                    .items_center()
                    .px_4()
                    .gap_4()
                    .child(
                        self.button("btn-fit", format!("Fit: {:?}", FITS[self.fit]))
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.fit = (this.fit + 1) % FITS.len();
                                this.update_player(cx);
                            })),
                    )
                    .child(
                        self.button("btn-size", format!("Size: {size_text}"))
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.size = (this.size + 1) % SIZES.len();
                                this.update_player(cx);
                            })),
                    )
                    .child(div().text_color(rgb(0xcccccc)).child(self.status.clone())),
            )
            .child(
                div()
                    .flex_1()
                    .flex()
                    .items_center()
                    .justify_center()
                    .child(self.player.clone()),
            )
    }
}

fn main() {
    env_logger::init();
    Application::new().run(|cx: &mut App| {
        let path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/test.mp4"));
        let uri = Url::from_file_path(path.canonicalize().unwrap_or(path))
            .expect("invalid file path");

        cx.open_window(
            WindowOptions {
                focus: true,
                ..Default::default()
            },
            |_, cx| {
                let options = PlayerOptions::default().log_level(None);
                let (width, height) = SIZES[0];
                let player = VideoPlayer::with_options(&uri, options)
                    .expect("failed to create video player")
                    .width(px(width.unwrap_or(800.0)))
                    .height(px(height.unwrap_or(600.0)))
                    .content_fit(ContentFit::Contain);

                let player = cx.new(|_| video_player(player));
                cx.new(|cx| SizedPlayerExample::new(player, cx))
            },
        )
        .unwrap();
        cx.activate(true);
    });
}
