mod chapters;
mod exports;
mod home;
mod review;
mod scores;
mod search;
mod settings;
mod state;
mod take_quiz;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chapters::ChapterQuizzesView;
pub use exports::ExportsView;
pub use home::HomeView;
pub use review::AttemptReviewView;
pub use scores::ScoresView;
pub use search::SearchView;
pub use settings::NotificationSettingsPanel;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use take_quiz::TakeQuizView;
