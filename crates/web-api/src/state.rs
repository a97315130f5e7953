use std::sync::Arc;

use application::{GetUserUseCase, LoginUseCase, SubmitUserUseCase};

#[derive(Clone)]
pub struct AppState {
    pub submit_user: Arc<SubmitUserUseCase>,
    pub get_user: Arc<GetUserUseCase>,
    pub login: Arc<LoginUseCase>,
}

impl AppState {
    pub fn new(
        submit_user: Arc<SubmitUserUseCase>,
        get_user: Arc<GetUserUseCase>,
        login: Arc<LoginUseCase>,
    ) -> Self {
        Self {
            submit_user,
            get_user,
            login,
        }
    }
}
