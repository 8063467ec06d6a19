use gpui::{App, Application, Context, Entity, Render, Window, WindowOptions, div, prelude::*};
use gpui_mpv_player::{VideoPlayerEvent, VideoPlayerView, video_player_from_uri};
use std::path::PathBuf;
use url::Url;

struct PlayerExample {
    player: Entity<VideoPlayerView>,
}

impl Render for PlayerExample {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div().size_full().child(self.player.clone())
    }
}

fn media_uri(default: &str) -> Url {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(default));
    let path = path.canonicalize().unwrap_or(path);
    Url::from_file_path(path).expect("invalid file path")
}

fn main() {
    env_logger::init();
    Application::new().run(|cx: &mut App| {
        let uri = media_uri("assets/test.mp4");

        cx.open_window(
            WindowOptions {
                focus: true,
                ..Default::default()
            },
            |_, cx| {
                let view = video_player_from_uri(&uri).expect("failed to create video player");
                let player = cx.new(|_| view);
                cx.subscribe(&player, |_, event: &VideoPlayerEvent, _| match event {
                    VideoPlayerEvent::NewFrame => {}
                    other => log::info!("player event: {other:?}"),
                })
                .detach();
                cx.new(|_| PlayerExample { player })
            },
        )
        .unwrap();
        cx.activate(true);
    });
}
