//! In-memory implementations of the repository and collaborator traits used
//! by the unit tests in this crate.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::accounts::{AccountError, NewStellarAccount, StellarAccount, StellarAccountRepositoryTrait};
use crate::constants::MAX_LINKED_ACCOUNTS;
use crate::errors::{DatabaseError, Error, Result};
use crate::ledger::{LedgerClientTrait, LedgerError, RawBalance};
use crate::portfolio::snapshot::{
    AssetBalance, HistoryPage, PortfolioSnapshot, SnapshotRepositoryTrait,
};
use crate::portfolio::valuation::{ValuationError, ValuationResolverTrait};
use crate::users::{NewUser, User, UserRepositoryTrait};

pub const KEY_A: &str = "GCZJM35NKGVK47BB4SPBDV25477PZYIYPVVG453LPYFNXLS3FGHDXOCM";
pub const KEY_B: &str = "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN";

/// Deterministic, structurally valid public key for index `n`.
pub fn test_key(n: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
    let mut key = String::from("G");
    let mut value = n;
    for _ in 0..55 {
        key.push(ALPHABET[value % 32] as char);
        value /= 32;
    }
    key
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Snapshot with a single balance worth `total`.
pub fn snapshot_at(id: &str, user_id: &str, created_at: DateTime<Utc>, total: Decimal) -> PortfolioSnapshot {
    PortfolioSnapshot::from_balances(
        id.to_string(),
        user_id.to_string(),
        created_at,
        vec![AssetBalance {
            asset_code: "XLM".to_string(),
            asset_issuer: None,
            amount: total * Decimal::TEN,
            value_usd: total,
        }],
    )
}

pub fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

// ==================== Snapshot store ====================

#[derive(Default)]
pub struct InMemorySnapshotRepository {
    rows: Mutex<Vec<PortfolioSnapshot>>,
    unavailable: AtomicBool,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshots(snapshots: Vec<PortfolioSnapshot>) -> Self {
        Self {
            rows: Mutex::new(snapshots),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn all_for(&self, user_id: &str) -> Vec<PortfolioSnapshot> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(Error::Database(DatabaseError::ConnectionFailed(
                "store offline".to_string(),
            )))
        } else {
            Ok(())
        }
    }

    fn sorted_newest_first(&self, user_id: &str) -> Vec<PortfolioSnapshot> {
        let mut rows = self.all_for(user_id);
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for InMemorySnapshotRepository {
    async fn append(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        self.check_available()?;
        self.rows.lock().unwrap().push(snapshot.clone());
        Ok(snapshot)
    }

    fn latest(&self, user_id: &str) -> Result<Option<PortfolioSnapshot>> {
        self.check_available()?;
        Ok(self.sorted_newest_first(user_id).into_iter().next())
    }

    fn latest_before(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<PortfolioSnapshot>> {
        self.check_available()?;
        Ok(self
            .sorted_newest_first(user_id)
            .into_iter()
            .find(|s| s.created_at <= cutoff))
    }

    fn page(&self, user_id: &str, page: HistoryPage) -> Result<(Vec<PortfolioSnapshot>, i64)> {
        self.check_available()?;
        let rows = self.sorted_newest_first(user_id);
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }
}

// ==================== Users ====================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    list_fails: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn with_users(ids: &[&str]) -> Self {
        let now = Utc::now().naive_utc();
        let users = ids
            .iter()
            .map(|id| User {
                id: id.to_string(),
                email: None,
                stellar_public_key: None,
                created_at: now,
                updated_at: now,
            })
            .collect();
        Self {
            users: Mutex::new(users),
            list_fails: AtomicBool::new(false),
        }
    }

    pub fn set_list_fails(&self, fails: bool) {
        self.list_fails.store(fails, Ordering::SeqCst);
    }

    pub fn primary_key_of(&self, user_id: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .and_then(|u| u.stellar_public_key.clone())
    }

    fn claim_primary_if_unset(&self, user_id: &str, public_key: &str) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            if user.stellar_public_key.is_none() {
                user.stellar_public_key = Some(public_key.to_string());
            }
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let now = Utc::now().naive_utc();
        let user = User {
            id: new_user
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            email: new_user.email,
            stellar_public_key: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    fn list_user_ids(&self) -> Result<Vec<String>> {
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::ConnectionFailed(
                "directory offline".to_string(),
            )));
        }
        Ok(self.users.lock().unwrap().iter().map(|u| u.id.clone()).collect())
    }

    fn exists(&self, user_id: &str) -> Result<bool> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.id == user_id))
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    async fn set_primary_public_key(&self, user_id: &str, public_key: &str) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))?;
        user.stellar_public_key = Some(public_key.to_string());
        Ok(())
    }
}

// ==================== Stellar accounts ====================

pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<StellarAccount>>,
    users: Arc<InMemoryUserRepository>,
    sequence: AtomicUsize,
}

impl InMemoryAccountRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            users,
            sequence: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl StellarAccountRepositoryTrait for InMemoryAccountRepository {
    async fn create_and_claim_primary(
        &self,
        new_account: NewStellarAccount,
    ) -> Result<StellarAccount> {
        let mut accounts = self.accounts.lock().unwrap();
        let active = accounts
            .iter()
            .filter(|a| a.user_id == new_account.user_id && a.is_active)
            .count();
        if active >= MAX_LINKED_ACCOUNTS {
            return Err(AccountError::AccountLimitExceeded(MAX_LINKED_ACCOUNTS).into());
        }
        if accounts.iter().any(|a| a.public_key == new_account.public_key) {
            return Err(AccountError::DuplicateAccount(new_account.public_key).into());
        }
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) as i64;
        // Strictly increasing timestamps keep "newest first" deterministic.
        let created_at = Utc::now().naive_utc() + Duration::milliseconds(seq);
        let account = StellarAccount {
            id: format!("acc-{}", seq),
            user_id: new_account.user_id,
            public_key: new_account.public_key,
            label: new_account.label,
            is_active: true,
            created_at,
            updated_at: created_at,
        };
        self.users
            .claim_primary_if_unset(&account.user_id, &account.public_key);
        accounts.push(account.clone());
        Ok(account)
    }

    fn get_by_id_for_user(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<Option<StellarAccount>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == account_id && a.user_id == user_id)
            .cloned())
    }

    fn find_by_public_key(&self, public_key: &str) -> Result<Option<StellarAccount>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.public_key == public_key)
            .cloned())
    }

    fn count_active(&self, user_id: &str) -> Result<usize> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active)
            .count())
    }

    fn list_active(&self, user_id: &str) -> Result<Vec<StellarAccount>> {
        let mut active: Vec<StellarAccount> = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn update_label(
        &self,
        user_id: &str,
        account_id: &str,
        label: Option<String>,
    ) -> Result<StellarAccount> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == account_id && a.user_id == user_id)
            .ok_or_else(|| AccountError::NotFound(account_id.to_string()))?;
        account.label = label;
        Ok(account.clone())
    }

    async fn deactivate(&self, user_id: &str, account_id: &str) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == account_id && a.user_id == user_id)
            .ok_or_else(|| AccountError::NotFound(account_id.to_string()))?;
        account.is_active = false;
        Ok(())
    }
}

// ==================== Ledger ====================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExistenceProbe {
    Exists,
    Missing,
    Unreachable,
}

pub struct MockLedgerClient {
    balances: Mutex<HashMap<String, Vec<RawBalance>>>,
    failing_keys: Mutex<HashSet<String>>,
    probe: Mutex<ExistenceProbe>,
    probe_calls: AtomicUsize,
}

impl MockLedgerClient {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            failing_keys: Mutex::new(HashSet::new()),
            probe: Mutex::new(ExistenceProbe::Exists),
            probe_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_balances(&self, public_key: &str, balances: Vec<RawBalance>) {
        self.balances
            .lock()
            .unwrap()
            .insert(public_key.to_string(), balances);
    }

    pub fn fail_for(&self, public_key: &str) {
        self.failing_keys
            .lock()
            .unwrap()
            .insert(public_key.to_string());
    }

    pub fn set_probe(&self, probe: ExistenceProbe) {
        *self.probe.lock().unwrap() = probe;
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClientTrait for MockLedgerClient {
    async fn get_balances(&self, public_key: &str) -> Result<Vec<RawBalance>> {
        if self.failing_keys.lock().unwrap().contains(public_key) {
            return Err(LedgerError::Request(format!("horizon timeout for {}", public_key)).into());
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(public_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn account_exists(&self, public_key: &str) -> Result<bool> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        match *self.probe.lock().unwrap() {
            ExistenceProbe::Exists => Ok(true),
            ExistenceProbe::Missing => Ok(false),
            ExistenceProbe::Unreachable => {
                Err(LedgerError::Request(format!("cannot reach horizon for {}", public_key)).into())
            }
        }
    }
}

// ==================== Valuation ====================

/// Prices every asset at a fixed unit price, except the codes marked as failing.
pub struct MockValuationResolver {
    prices: HashMap<String, Decimal>,
    failing_codes: HashSet<String>,
}

impl MockValuationResolver {
    pub fn new(prices: &[(&str, Decimal)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(code, price)| (code.to_string(), *price))
                .collect(),
            failing_codes: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, asset_code: &str) -> Self {
        self.failing_codes.insert(asset_code.to_string());
        self
    }
}

#[async_trait]
impl ValuationResolverTrait for MockValuationResolver {
    async fn resolve(
        &self,
        asset_code: &str,
        asset_issuer: Option<&str>,
        amount: Decimal,
    ) -> Result<Decimal> {
        if self.failing_codes.contains(asset_code) {
            return Err(ValuationError::unavailable(asset_code, asset_issuer, "price feed down").into());
        }
        let price = self.prices.get(asset_code).ok_or_else(|| {
            ValuationError::unavailable(asset_code, asset_issuer, "unknown asset")
        })?;
        Ok(amount * *price)
    }
}
