//! Runs blocking HTTP calls off the UI thread.
//!
//! Every request gets its own thread. Requests are not coordinated, so a
//! slow response can arrive after a newer one.
use crate::exercise_search::ExerciseSearchClient;
use crate::persistence::PersistenceClient;
use crate::settings::Settings;
use crate::state::{Outcome, Request};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

pub struct Clients {
    pub persistence: PersistenceClient,
    pub search: ExerciseSearchClient,
}

impl Clients {
    pub fn from_settings(settings: &Settings) -> Self {
        let key = crate::exercise_search::resolve_api_key(settings.exercise_api_key.as_deref());
        Self {
            persistence: PersistenceClient::new(&settings.backend_url),
            search: ExerciseSearchClient::new(
                &settings.exercise_api_url,
                &settings.exercise_api_host,
                key,
            ),
        }
    }

    /// Perform one request synchronously.
    pub fn execute(&self, request: Request) -> Outcome {
        match request {
            Request::List => Outcome::Listed(self.persistence.list()),
            Request::Save(entry) => Outcome::Saved(self.persistence.save(&entry)),
            Request::Delete(id) => Outcome::Deleted(self.persistence.remove(&id)),
            Request::Search(query) => Outcome::Searched(self.search.search(&query)),
        }
    }
}

pub struct Worker {
    clients: Arc<Clients>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
    repaint: Option<egui::Context>,
}

impl Worker {
    pub fn new(clients: Clients) -> Self {
        let (tx, rx) = channel();
        Self {
            clients: Arc::new(clients),
            tx,
            rx,
            repaint: None,
        }
    }

    /// Wake the UI whenever an outcome arrives.
    pub fn set_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    /// Swap the clients, e.g. after the settings changed. Requests already
    /// running finish against the old ones.
    pub fn replace_clients(&mut self, clients: Clients) {
        self.clients = Arc::new(clients);
    }

    pub fn dispatch(&self, request: Request) {
        let clients = Arc::clone(&self.clients);
        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        std::thread::spawn(move || {
            let outcome = clients.execute(request);
            if tx.send(outcome).is_err() {
                log::debug!("UI closed before request finished");
                return;
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Outcomes that have arrived since the last call.
    pub fn poll(&self) -> Vec<Outcome> {
        self.rx.try_iter().collect()
    }
}
