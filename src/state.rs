use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::dialog::Dialog;
use crate::services::messaging::MessagingProvider;
use crate::services::store::SessionStore;

pub struct AppState {
    pub config: AppConfig,
    pub sessions: Arc<SessionStore>,
    pub dialog: Dialog,
    pub messaging: Box<dyn MessagingProvider>,
}
