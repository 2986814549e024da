use crate::commands::{parse_kind, KINDS};
use crate::config::Config;
use crate::query::{Query, QueryState};
use crate::store::{ErrorHook, SqliteStorage, Store, StoreSnapshot, SwallowedError};
use crate::swapi::{CatalogClient, EntityDetail, EntityKind, FavoriteRecord, FavoritesClient};
use clap::Subcommand;
use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Load and print one list
  List {
    #[arg(value_parser = parse_kind)]
    kind: EntityKind,
  },
  /// Load people, planets and vehicles at once
  Browse,
  /// Show the full record of one entity
  Show {
    #[arg(value_parser = parse_kind)]
    kind: EntityKind,
    uid: String,
  },
  /// Reconcile favorites with the backend and print them
  Favorites,
  /// Change favorites
  Fav {
    #[command(subcommand)]
    action: FavAction,
  },
  /// Print what is cached locally
  Status,
}

#[derive(Debug, Subcommand)]
pub enum FavAction {
  Add {
    #[arg(value_parser = parse_kind)]
    kind: EntityKind,
    uid: String,
    /// Display name (defaults to the cached name)
    #[arg(long)]
    name: Option<String>,
  },
  Remove {
    #[arg(value_parser = parse_kind)]
    kind: EntityKind,
    uid: String,
  },
  Toggle {
    #[arg(value_parser = parse_kind)]
    kind: EntityKind,
    uid: String,
    #[arg(long)]
    name: Option<String>,
  },
}

/// Command-line front end over the store
pub struct App {
  store: Arc<Store<SqliteStorage>>,
}

impl App {
  pub fn new(config: &Config, ephemeral: bool) -> Result<Self> {
    let catalog = CatalogClient::new(config.catalog.url())?;
    let backend = FavoritesClient::new(config.backend.url(), config.backend.user_id)?;

    let storage = if ephemeral {
      SqliteStorage::open_in_memory()?
    } else {
      SqliteStorage::open(config.storage.path.as_deref())?
    };

    let hook: ErrorHook = Arc::new(|e: &SwallowedError| {
      if let SwallowedError::Persistence(_) = e {
        eprintln!("warning: {}", e);
      }
    });

    let store = Store::open(catalog, backend, storage, Some(hook));
    info!(
      catalog = config.catalog.url(),
      backend = config.backend.url(),
      user_id = config.backend.user_id,
      "store ready"
    );

    Ok(Self {
      store: Arc::new(store),
    })
  }

  pub async fn run(&self, command: Command) -> Result<()> {
    match command {
      Command::List { kind } => {
        self.store.load_list(kind).await;
        print_list(&self.store.snapshot(), kind);
      }
      Command::Browse => {
        self.store.load_all_lists().await;
        let snapshot = self.store.snapshot();
        for entry in KINDS {
          println!("== {} ==", entry.description);
          print_list(&snapshot, entry.kind);
          println!();
        }
      }
      Command::Show { kind, uid } => self.show(kind, uid).await,
      Command::Favorites => {
        self.store.load_favorites().await;
        print_favorites(&self.store.snapshot());
      }
      Command::Fav { action } => {
        self.change_favorite(action).await;
        print_favorites(&self.store.snapshot());
      }
      Command::Status => self.print_status(),
    }

    match &self.store.snapshot().error {
      Some(error) => Err(eyre!("{}", error)),
      None => Ok(()),
    }
  }

  async fn show(&self, kind: EntityKind, uid: String) {
    let store = Arc::clone(&self.store);
    let requested = uid.clone();
    let mut query = Query::new(move || {
      let store = Arc::clone(&store);
      let uid = requested.clone();
      async move { store.load_detail(kind, &uid).await }
    });

    query.fetch();
    if !wait_or_interrupt(&mut query).await {
      eprintln!("cancelled");
      return;
    }

    if let QueryState::Success(detail) = query.state() {
      print_detail(&self.store.snapshot(), kind, &uid, detail);
    }
  }

  async fn change_favorite(&self, action: FavAction) {
    match action {
      FavAction::Add { kind, uid, name } => {
        let name = name.unwrap_or_else(|| self.store.snapshot().display_name(kind, &uid));
        self
          .store
          .add_favorite(FavoriteRecord::new(kind, uid, name))
          .await;
      }
      FavAction::Remove { kind, uid } => self.store.remove_favorite(kind, &uid).await,
      FavAction::Toggle { kind, uid, name } => {
        let name = name.unwrap_or_else(|| self.store.snapshot().display_name(kind, &uid));
        self.store.toggle_favorite(kind, &uid, &name).await;
      }
    }
  }

  fn print_status(&self) {
    let snapshot = self.store.snapshot();
    for kind in EntityKind::ALL {
      println!("{:<10} {} cached", kind, snapshot.list(kind).len());
    }
    println!("{:<10} {} cached", "details", snapshot.details.len());
    println!("{:<10} {}", "favorites", snapshot.favorites.len());
    match self.store.saved_at() {
      Some(at) => println!("{:<10} {}", "saved", at.format("%Y-%m-%d %H:%M:%S UTC")),
      None => println!("{:<10} never", "saved"),
    }
  }
}

/// Wait for `query` to settle, abandoning it on Ctrl-C.
///
/// Returns `false` when interrupted; the pending result is then discarded.
async fn wait_or_interrupt<T: Send + 'static>(query: &mut Query<T>) -> bool {
  let interrupted = tokio::select! {
    _ = query.wait() => false,
    result = tokio::signal::ctrl_c() => match result {
      Ok(()) => true,
      Err(e) => {
        warn!(error = %e, "ctrl-c handler unavailable");
        false
      }
    },
  };

  if interrupted {
    query.cancel();
    return false;
  }
  if query.state().is_loading() {
    query.wait().await;
  }
  true
}

fn print_list(snapshot: &StoreSnapshot, kind: EntityKind) {
  let items = snapshot.list(kind);
  if items.is_empty() {
    println!("(no {})", kind);
    return;
  }

  for item in items {
    let marker = if snapshot.is_favorite(kind, &item.uid) {
      '*'
    } else {
      ' '
    };
    println!("{} {:>4}  {}", marker, item.uid, item.name);
  }
}

fn print_detail(snapshot: &StoreSnapshot, kind: EntityKind, uid: &str, detail: &EntityDetail) {
  println!("{}", snapshot.display_name(kind, uid));
  println!("{}", kind.subtitle());
  if snapshot.is_favorite(kind, uid) {
    println!("* favorite");
  }
  println!("image: {}", kind.image_url(uid));

  if !detail.description.is_empty() {
    println!();
    println!("{}", detail.description);
  }

  println!();
  for (key, value) in &detail.properties {
    println!("{:<16} {}", key.replace('_', " "), value);
  }
}

fn print_favorites(snapshot: &StoreSnapshot) {
  println!("Favorites ({})", snapshot.favorites.len());
  for fav in &snapshot.favorites {
    println!("  {:<8} {:>4}  {}", fav.kind, fav.uid, fav.name);
  }
}
