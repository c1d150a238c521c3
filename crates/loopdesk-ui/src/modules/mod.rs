// crates/loopdesk-ui/src/modules/mod.rs
//
// Panel modules read ReviewState and emit ReviewCommands; they never mutate
// state directly. video_module and audio_module have no panel and are ticked
// from app.rs instead.

pub mod audio_module;
pub mod key_moments;
pub mod player;
pub mod timeline;
pub mod upload;
pub mod video_module;

use egui::Ui;
use loopdesk_core::commands::ReviewCommand;
use loopdesk_core::state::ReviewState;

/// Every visible panel implements this trait.
pub trait ReviewModule {
    fn name(&self) -> &str;
    fn ui(&mut self, ui: &mut Ui, state: &ReviewState, cmd: &mut Vec<ReviewCommand>);
}
