use crate::api::{ApiClient, QueryService};
use crate::config::Config;
use crate::dispatch::{Command, InputDispatcher};
use crate::session::{SessionController, delete_session_best_effort};
use crate::stats::CourseSummary;
use crate::storage::{PlatformBackend, platform_backend};
use crate::theme::{ThemeController, ThemeStore, palette_css};
use crate::types::Preference;
use crate::views::{ChatView, Sidebar};
use dioxus::prelude::*;
use tracing::{debug, info, warn};

type Backend = PlatformBackend;

const APP_CSS: Asset = asset!("/assets/style.css");

fn load_config() -> Config {
    Config::from_env().unwrap_or_else(|err| {
        warn!("falling back to default configuration: {err:#}");
        Config::default()
    })
}

fn build_theme(config: &Config) -> ThemeController<Backend> {
    let store = ThemeStore::new(platform_backend(&config.data_dir), Some(config.system_theme));
    let mut controller = ThemeController::new(store);
    controller.subscribe(|preference| info!(theme = %preference, "themechange"));
    controller.initialize();
    controller
}

#[component]
pub fn App() -> Element {
    let config = use_hook(load_config);
    let client = use_hook(|| ApiClient::new(config.api_base.clone()));
    let session = use_signal(SessionController::default);
    let dispatcher = use_signal(InputDispatcher::new);
    let theme = use_signal(|| build_theme(&config));
    let courses = use_signal(|| CourseSummary::Loading);

    use_course_stats(client.clone(), courses);
    use_ambient_theme(theme);

    let on_command = use_command_runner(client, session, dispatcher, theme);

    let attributes = theme.read().attributes().clone();
    let palette = palette_css(theme.read().current());

    rsx! {
        document::Link { rel: "stylesheet", href: APP_CSS }
        style { dangerous_inner_html: "{palette}" }
        div {
            class: "container {attributes.class}",
            "data-theme": attributes.data_theme,
            header {
                h1 { "Course Materials Assistant" }
                p { class: "subtitle", "Ask questions about courses, instructors, and content" }
            }
            div { class: "main-content",
                Sidebar {
                    courses,
                    dispatcher,
                    toggle_label: attributes.toggle_label,
                    on_command,
                }
                ChatView { session, dispatcher, on_command }
            }
        }
    }
}

fn use_course_stats(client: ApiClient, courses: Signal<CourseSummary>) {
    use_hook(move || {
        let mut courses = courses;
        spawn(async move {
            let result = client.course_stats().await;
            courses.set(CourseSummary::from_result(result));
        });
    });
}

/// Reports the page's color-scheme media query, then every change to it.
const AMBIENT_SCRIPT: &str = r#"
    const query = window.matchMedia("(prefers-color-scheme: dark)");
    dioxus.send(query.matches);
    query.addEventListener("change", (event) => dioxus.send(event.matches));
    await new Promise(() => {});
"#;

// COURSECHAT_SYSTEM_THEME seeds the ambient signal until the platform answers.
fn use_ambient_theme(theme: Signal<ThemeController<Backend>>) {
    use_hook(move || {
        let mut theme = theme;
        spawn(async move {
            let mut media = document::eval(AMBIENT_SCRIPT);
            while let Ok(prefers_dark) = media.recv::<bool>().await {
                let preference = Preference::from_prefers_dark(prefers_dark);
                if theme.write().observe_ambient(preference) {
                    info!(theme = %preference, "following system theme");
                }
            }
            debug!("system color scheme unavailable");
        });
    });
}

fn use_command_runner(
    client: ApiClient,
    session: Signal<SessionController>,
    dispatcher: Signal<InputDispatcher>,
    theme: Signal<ThemeController<Backend>>,
) -> Callback<Command> {
    let mut session = session;
    let mut dispatcher = dispatcher;
    let mut theme = theme;
    use_callback(move |command: Command| match command {
        Command::Submit(text) => {
            let Some(pending) = session.write().begin_submit(&text) else {
                return;
            };
            dispatcher.write().set_pending(true);
            let client = client.clone();
            spawn(async move {
                let outcome = client.query(&pending.request).await;
                session.write().resolve(pending.ticket, outcome);
                let still_pending = session.peek().is_pending();
                dispatcher.write().set_pending(still_pending);
            });
        }
        Command::ToggleTheme => {
            theme.write().toggle();
        }
        Command::StartNewSession => {
            session.write().start_new_session();
            dispatcher.write().set_pending(false);
        }
        Command::ClearSession => {
            let previous = session.write().take_session_for_clear();
            dispatcher.write().set_pending(false);
            if let Some(session_id) = previous {
                let client = client.clone();
                spawn(async move {
                    delete_session_best_effort(&client, &session_id).await;
                });
            }
        }
    })
}
