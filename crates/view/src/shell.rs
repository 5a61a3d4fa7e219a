use std::sync::Arc;

use cinesearch_client::MovieApi;
use cinesearch_core::MovieId;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{ControllerConfig, DetailController, SearchController};

/// Which view is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "movie_id", rename_all = "snake_case")]
pub enum Screen {
    #[default]
    List,
    Detail(MovieId),
}

/// Navigation between the search list and a movie's detail view.
///
/// The list controller lives as long as the shell, so going back shows the
/// query and results the user left.
pub struct Shell {
    search: SearchController,
    detail: DetailController,
    screen: Screen,
}

impl Shell {
    pub fn new(api: Arc<dyn MovieApi>, config: ControllerConfig) -> Self {
        Self {
            search: SearchController::new(Arc::clone(&api), config),
            detail: DetailController::new(api),
            screen: Screen::List,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn detail(&self) -> &DetailController {
        &self.detail
    }

    /// Open a movie, from the result list or from a recommendation.
    pub fn select_movie(&mut self, id: MovieId) -> JoinHandle<()> {
        debug!(movie_id = %id, "navigate to detail");
        self.screen = Screen::Detail(id.clone());
        self.detail.select(id)
    }

    pub fn go_back(&mut self) {
        if self.screen == Screen::List {
            return;
        }
        debug!("navigate to list");
        self.detail.close();
        self.screen = Screen::List;
    }

    pub fn shutdown(&self) {
        self.search.shutdown();
        self.detail.close();
    }
}
