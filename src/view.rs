use crate::audio::AudioOutput;
use crate::constants::*;
use crate::dom;
use crate::events::{pointer, Listener};
use crate::finale::FinaleView;
use crate::puzzles::{MazeView, MemoryView, PuzzleContext, RiddleView};
use guardian_core::{Cue, Snapshot, Stage};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Callbacks the mounted stage content may fire.
#[derive(Clone)]
pub struct StageHooks {
    pub audio: Rc<RefCell<AudioOutput>>,
    pub on_begin: Rc<dyn Fn()>,
    pub on_complete: Rc<dyn Fn()>,
}

struct IntroView {
    button: web::HtmlElement,
    _click: Listener,
    _hover: Listener,
}

impl IntroView {
    fn mount(container: &web::HtmlElement, hooks: &StageHooks) -> anyhow::Result<Self> {
        container.set_inner_html(
            "<button class=\"begin\">BEGIN JOURNEY <span class=\"play\">&#9654;</span></button>",
        );
        let button: web::HtmlElement = dom::query(container, "button.begin")?;
        let on_begin = hooks.on_begin.clone();
        let click = pointer::on_click(&button, move || on_begin());
        let audio = hooks.audio.clone();
        let hover = Listener::new(&button, "mouseenter", move |_| {
            audio.borrow_mut().play(Cue::Hover);
        });
        Ok(Self {
            button,
            _click: click,
            _hover: hover,
        })
    }
}

// variants are only held for their Drop
#[allow(dead_code)]
enum Mounted {
    Empty,
    Intro(IntroView),
    Riddle(RiddleView),
    Maze(MazeView),
    Memory(MemoryView),
    Finale(FinaleView),
}

fn stage_slug(stage: Stage) -> &'static str {
    match stage {
        Stage::Intro => "intro",
        Stage::Chapter1 => "chapter-1",
        Stage::Chapter2 => "chapter-2",
        Stage::Chapter3 => "chapter-3",
        Stage::Finale => "finale",
    }
}

/// The page chrome around the stage content: story panel, transition fade,
/// per-stage background and the audio toggle label.
pub struct StageView {
    document: web::Document,
    main: web::HtmlElement,
    panel: web::HtmlElement,
    title: web::HtmlElement,
    story: web::HtmlElement,
    loading: web::HtmlElement,
    content: web::HtmlElement,
    audio_button: web::HtmlElement,
    mounted: Mounted,
}

impl StageView {
    pub fn bind(document: &web::Document) -> anyhow::Result<Self> {
        Ok(Self {
            document: document.clone(),
            main: dom::html_by_id(document, MAIN_ID)?,
            panel: dom::html_by_id(document, STORY_PANEL_ID)?,
            title: dom::html_by_id(document, STAGE_TITLE_ID)?,
            story: dom::html_by_id(document, STORY_TEXT_ID)?,
            loading: dom::html_by_id(document, STORY_LOADING_ID)?,
            content: dom::html_by_id(document, CONTENT_ID)?,
            audio_button: dom::html_by_id(document, AUDIO_TOGGLE_ID)?,
            mounted: Mounted::Empty,
        })
    }

    pub fn audio_button(&self) -> &web::HtmlElement {
        &self.audio_button
    }

    pub fn render(&self, snap: &Snapshot) {
        let cl = self.main.class_list();
        _ = if snap.is_transitioning {
            cl.add_1(TRANSITIONING_CLASS)
        } else {
            cl.remove_1(TRANSITIONING_CLASS)
        };
        if let Some(body) = self.document.body() {
            _ = body.set_attribute("data-stage", stage_slug(snap.stage));
        }

        dom::set_hidden(&self.panel, snap.stage == Stage::Finale);
        self.title.set_text_content(Some(snap.stage.label()));
        dom::set_hidden(&self.loading, !snap.is_loading_story);
        dom::set_hidden(&self.story, snap.is_loading_story);
        self.story.set_text_content(Some(&snap.story_text));

        if let Mounted::Intro(intro) = &self.mounted {
            dom::set_hidden(&intro.button, snap.is_loading_story);
        }

        self.audio_button
            .set_text_content(Some(if snap.audio_enabled { "\u{1F50A}" } else { "\u{1F507}" }));
        _ = self
            .audio_button
            .set_attribute("aria-pressed", if snap.audio_enabled { "true" } else { "false" });
    }

    /// Replace the stage content. The previous content is torn down first so
    /// its timers and listeners never overlap the new stage.
    pub fn mount_stage(&mut self, stage: Stage, hooks: &StageHooks) {
        self.unmount();
        let ctx = PuzzleContext {
            audio: hooks.audio.clone(),
            on_complete: hooks.on_complete.clone(),
        };
        let mounted = match stage {
            Stage::Intro => IntroView::mount(&self.content, hooks).map(Mounted::Intro),
            Stage::Chapter1 => RiddleView::mount(&self.content, ctx).map(Mounted::Riddle),
            Stage::Chapter2 => MazeView::mount(&self.content, ctx).map(Mounted::Maze),
            Stage::Chapter3 => MemoryView::mount(&self.content, ctx).map(Mounted::Memory),
            Stage::Finale => FinaleView::mount(&self.content, hooks.audio.clone()).map(Mounted::Finale),
        };
        match mounted {
            Ok(m) => {
                if let Mounted::Finale(f) = &m {
                    log::info!("[view] finale mounted, animating={}", f.is_animating());
                } else {
                    log::info!("[view] mounted {}", stage);
                }
                self.mounted = m;
            }
            Err(e) => log::error!("[view] mount {} failed: {:?}", stage, e),
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = Mounted::Empty;
        self.content.set_inner_html("");
    }
}
