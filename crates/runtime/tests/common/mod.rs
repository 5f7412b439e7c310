//! Shared fixture for runtime integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;

use game_core::{
    Account, AccountId, BoostSpec, Character, ContainerInfo, ContainerKind, DefinitionId,
    EntityId, Item, ItemCatalog, ItemDefinition, ItemEffect, ItemKind, RewardEntry, RewardTable,
    Robot, SessionId, Tint,
};
use runtime::repository::{ChangeSet, Versioned};
use runtime::{
    Command, InMemoryRepository, Message, Repository, RepositoryError, Request, RequestHandler,
    RequestRouter, Runtime, RuntimeConfig, TransactionLogEvent,
};

pub const ACCOUNT: AccountId = AccountId(1);
pub const CHARACTER: EntityId = EntityId(100);
pub const OTHER_CHARACTER: EntityId = EntityId(101);
pub const ROBOT: EntityId = EntityId(200);
pub const BASE: EntityId = EntityId(7);

/// Public storage on the docking base.
pub const HANGAR: EntityId = EntityId(300);
/// Cargo hold of [`ROBOT`].
pub const CARGO: EntityId = EntityId(301);
/// Private crate of [`CHARACTER`].
pub const CRATE: EntityId = EntityId(302);
/// Private crate of [`OTHER_CHARACTER`].
pub const FOREIGN_CRATE: EntityId = EntityId(303);

pub const ORE: DefinitionId = DefinitionId(1);
pub const FRAME: DefinitionId = DefinitionId(3);
pub const LOTTERY: DefinitionId = DefinitionId(100);
pub const BOOST: DefinitionId = DefinitionId(101);
pub const PAINT: DefinitionId = DefinitionId(102);
pub const TEMPLATE: DefinitionId = DefinitionId(103);
pub const STAT_RESET: DefinitionId = DefinitionId(104);
pub const TELEPORT: DefinitionId = DefinitionId(105);
pub const BROKEN_LOTTERY: DefinitionId = DefinitionId(106);

pub const RED: Tint = Tint(0xff0000);

fn definition(id: DefinitionId, kind: ItemKind, stackable: bool, effect: ItemEffect) -> ItemDefinition {
    ItemDefinition {
        id,
        name: format!("def_{}", id.0),
        kind,
        stackable,
        effect,
    }
}

pub fn catalog() -> ItemCatalog {
    ItemCatalog::new([
        definition(ORE, ItemKind::Commodity, true, ItemEffect::None),
        definition(FRAME, ItemKind::Commodity, true, ItemEffect::None),
        definition(
            LOTTERY,
            ItemKind::Lottery,
            true,
            ItemEffect::Lottery(RewardTable::new(vec![RewardEntry {
                definition: ORE,
                weight: 1,
            }])),
        ),
        definition(
            BOOST,
            ItemKind::Boost,
            true,
            ItemEffect::Boost(BoostSpec {
                multiplier_percent: 150,
                duration_secs: 3_600,
            }),
        ),
        definition(PAINT, ItemKind::Paint, true, ItemEffect::Paint(RED)),
        definition(
            TEMPLATE,
            ItemKind::TemplateUnpack,
            true,
            ItemEffect::TemplateUnpack { produces: FRAME },
        ),
        definition(STAT_RESET, ItemKind::StatReset, true, ItemEffect::StatReset),
        definition(
            TELEPORT,
            ItemKind::TeleportRedeem,
            true,
            ItemEffect::TeleportRedeem { base_id: 7 },
        ),
        definition(
            BROKEN_LOTTERY,
            ItemKind::Lottery,
            true,
            ItemEffect::Lottery(RewardTable::default()),
        ),
    ])
}

/// Records every request routed to it.
#[derive(Default)]
pub struct RecordingHandler {
    pub requests: Mutex<Vec<Request>>,
}

#[async_trait]
impl RequestHandler for RecordingHandler {
    async fn handle(&self, request: Request, _router: &RequestRouter) -> runtime::Result<()> {
        self.requests.lock().unwrap().push(request);
        Ok(())
    }
}

/// In-memory repository whose commits can be made to fail.
pub struct FlakyRepository {
    pub inner: InMemoryRepository,
    pub fail_commits: AtomicBool,
}

impl FlakyRepository {
    pub fn fail_next_commits(&self) {
        self.fail_commits.store(true, Ordering::SeqCst);
    }
}

impl Repository for FlakyRepository {
    fn item(&self, id: EntityId) -> runtime::repository::Result<Option<Versioned<Item>>> {
        self.inner.item(id)
    }

    fn items_in(&self, container: EntityId) -> runtime::repository::Result<Vec<Versioned<Item>>> {
        self.inner.items_in(container)
    }

    fn container(&self, id: EntityId) -> runtime::repository::Result<Option<Versioned<ContainerInfo>>> {
        self.inner.container(id)
    }

    fn character(&self, id: EntityId) -> runtime::repository::Result<Option<Versioned<Character>>> {
        self.inner.character(id)
    }

    fn account(&self, id: AccountId) -> runtime::repository::Result<Option<Versioned<Account>>> {
        self.inner.account(id)
    }

    fn robot(&self, id: EntityId) -> runtime::repository::Result<Option<Versioned<Robot>>> {
        self.inner.robot(id)
    }

    fn allocate_id(&self) -> EntityId {
        self.inner.allocate_id()
    }

    fn commit(&self, changes: ChangeSet) -> runtime::repository::Result<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(RepositoryError::Backend("injected commit failure".into()));
        }
        self.inner.commit(changes)
    }
}

pub struct Fixture {
    pub runtime: Runtime,
    pub repo: Arc<FlakyRepository>,
    pub session: SessionId,
    pub messages: broadcast::Receiver<Message>,
    pub teleports: Arc<RecordingHandler>,
}

fn seed(repo: &InMemoryRepository) {
    let mut character = Character::new(CHARACTER, ACCOUNT);
    character.docked = true;
    character.in_game = true;
    character.extensions.insert(10, 4);
    character.extensions.insert(11, 6);
    repo.insert_character(character).unwrap();
    repo.insert_character(Character::new(OTHER_CHARACTER, AccountId(2)))
        .unwrap();

    let mut account = Account::new(ACCOUNT);
    account.extension_points = 5;
    repo.insert_account(account).unwrap();

    repo.insert_robot(Robot {
        id: ROBOT,
        owner: CHARACTER,
        tint: None,
    })
    .unwrap();

    for (id, kind, owner) in [
        (HANGAR, ContainerKind::Public { base: BASE }, EntityId::NONE),
        (CARGO, ContainerKind::RobotInventory { robot: ROBOT }, CHARACTER),
        (CRATE, ContainerKind::Private, CHARACTER),
        (FOREIGN_CRATE, ContainerKind::Private, OTHER_CHARACTER),
    ] {
        repo.insert_container(ContainerInfo { id, kind, owner })
            .unwrap();
    }
}

pub fn fixture() -> Fixture {
    let repo = Arc::new(FlakyRepository {
        inner: InMemoryRepository::new(10_000),
        fail_commits: AtomicBool::new(false),
    });
    seed(&repo.inner);

    let teleports = Arc::new(RecordingHandler::default());
    let config = RuntimeConfig {
        tick_interval: None,
        ..RuntimeConfig::default()
    };

    let runtime = Runtime::builder()
        .config(config)
        .repository(repo.clone())
        .catalog(catalog())
        .handler(Command::SparkTeleportUse, teleports.clone())
        .build()
        .unwrap();

    let session = runtime.sessions().open(ACCOUNT);
    runtime
        .sessions()
        .select_character(session, CHARACTER)
        .unwrap();
    let messages = runtime.subscribe_messages();

    Fixture {
        runtime,
        repo,
        session,
        messages,
        teleports,
    }
}

impl Fixture {
    /// Seeds an item owned by [`CHARACTER`] into `container`.
    pub fn give(&self, id: u64, definition: DefinitionId, container: EntityId, quantity: u32) -> EntityId {
        self.give_as(id, definition, container, quantity, CHARACTER)
    }

    pub fn give_as(
        &self,
        id: u64,
        definition: DefinitionId,
        container: EntityId,
        quantity: u32,
        owner: EntityId,
    ) -> EntityId {
        let catalog = catalog();
        let mut item = Item::new(EntityId(id), catalog.get(definition).unwrap(), owner, quantity);
        item.parent = Some(container);
        self.repo.inner.insert_item(item).unwrap();
        EntityId(id)
    }

    pub async fn use_item(&self, item: EntityId, container: EntityId) -> runtime::Result<()> {
        self.runtime
            .handle_request(Request::use_item(self.session, item, container))
            .await
    }

    pub fn item(&self, id: EntityId) -> Option<Item> {
        self.repo.item(id).unwrap().map(|record| record.value)
    }

    pub fn items_in(&self, container: EntityId) -> Vec<Item> {
        self.repo
            .items_in(container)
            .unwrap()
            .into_iter()
            .map(|record| record.value)
            .collect()
    }

    pub fn character(&self) -> Character {
        self.repo.character(CHARACTER).unwrap().unwrap().value
    }

    pub fn account(&self) -> Account {
        self.repo.account(ACCOUNT).unwrap().unwrap().value
    }

    pub fn robot(&self) -> Robot {
        self.repo.robot(ROBOT).unwrap().unwrap().value
    }

    pub fn history(&self) -> Vec<TransactionLogEvent> {
        self.repo.inner.history().unwrap()
    }

    pub fn set_docked(&self, docked: bool) {
        let mut character = self.character();
        character.docked = docked;
        self.repo.inner.insert_character(character).unwrap();
    }
}
