//! SQLite-backed store.
//!
//! A single connection behind a mutex is the serialization point for every
//! wallet and ticket mutation; each financial operation additionally runs
//! inside an explicit transaction so a failure at any step rolls the whole
//! operation back. Slots are persisted as a JSON column on the ticket row.

use anyhow::Context;
use instawin_engine::{RevealOutcome, TicketRng};
use instawin_types::api::{PurchaseReceipt, RegisterResponse, WalletBalances};
use instawin_types::{
    ClaimStatus, EntryKind, LedgerEntry, PlatformLimits, Sc, Slot, Ticket, TicketDesign,
    TicketError, TicketKind, TicketStatus,
};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use uuid::Uuid;

pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Everything produced by a committed purchase.
#[derive(Debug)]
pub struct PurchaseOutcome {
    pub ticket: Ticket,
    pub entry: LedgerEntry,
    pub wallet: WalletBalances,
    pub receipt: PurchaseReceipt,
}

/// Everything produced by a committed claim.
#[derive(Debug, PartialEq)]
pub struct ClaimOutcome {
    pub prize: Sc,
    pub winning_slot_index: u32,
    pub entry: LedgerEntry,
    pub wallet: WalletBalances,
}

pub struct Store {
    conn: Mutex<Connection>,
    rng: Mutex<TicketRng>,
    limits: PlatformLimits,
    starting_balances: WalletBalances,
}

impl Store {
    pub fn open(
        path: &Path,
        limits: PlatformLimits,
        starting_balances: WalletBalances,
        rng: TicketRng,
    ) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("open ticket store db")?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            rng: Mutex::new(rng),
            limits,
            starting_balances,
        })
    }

    pub fn limits(&self) -> &PlatformLimits {
        &self.limits
    }

    /// Insert one enabled design per family when the catalog is empty, so a
    /// fresh deployment is playable without an admin call.
    pub fn seed_default_designs(&self, win_probability: f64) -> anyhow::Result<()> {
        let conn = self.lock_conn();
        let count: u64 = conn
            .query_row("SELECT COUNT(*) FROM designs", [], |row| row.get(0))
            .context("query design count")?;
        if count > 0 {
            return Ok(());
        }
        conn.execute(
            "INSERT INTO designs (kind, name, cost, slot_count, win_probability, prize_min, prize_max, enabled)
             VALUES (?, ?, ?, ?, ?, ?, ?, 1)",
            params![
                TicketKind::PullTab.as_str(),
                "Lucky Seven",
                100u64,
                5u32,
                win_probability,
                1u64,
                1_000u64,
            ],
        )
        .context("seed pull-tab design")?;
        conn.execute(
            "INSERT INTO designs (kind, name, cost, slot_count, win_probability, prize_min, prize_max, enabled)
             VALUES (?, ?, ?, ?, ?, ?, ?, 1)",
            params![
                TicketKind::Scratch.as_str(),
                "Gold Rush",
                200u64,
                9u32,
                win_probability,
                1u64,
                1_000u64,
            ],
        )
        .context("seed scratch design")?;
        info!(win_probability, "Seeded default ticket designs");
        Ok(())
    }

    pub fn register_player(
        &self,
        name: &str,
    ) -> Result<(RegisterResponse, WalletBalances), TicketError> {
        let token = Uuid::new_v4().to_string();
        let now = unix_millis();
        let mut conn = self.lock_conn();
        let tx = conn.transaction().map_err(TicketError::storage)?;
        tx.execute(
            "INSERT INTO players (name, token, created_at) VALUES (?, ?, ?)",
            params![name, token, now],
        )
        .map_err(TicketError::storage)?;
        let player_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO wallets (player_id, gold_coins, sweeps_coins) VALUES (?, ?, ?)",
            params![
                player_id,
                self.starting_balances.gold_coins.cents(),
                self.starting_balances.sweeps_coins.cents(),
            ],
        )
        .map_err(TicketError::storage)?;
        tx.commit().map_err(TicketError::storage)?;

        Ok((
            RegisterResponse { player_id, token },
            WalletBalances {
                gold_coins: self.starting_balances.gold_coins,
                sweeps_coins: self.starting_balances.sweeps_coins,
            },
        ))
    }

    /// Resolve a bearer token to a player id. Unknown tokens are
    /// `Unauthorized`; callers never learn whether the token ever existed.
    pub fn player_by_token(&self, token: &str) -> Result<i64, TicketError> {
        let conn = self.lock_conn();
        conn.query_row(
            "SELECT id FROM players WHERE token = ?",
            params![token],
            |row| row.get(0),
        )
        .optional()
        .map_err(TicketError::storage)?
        .ok_or(TicketError::Unauthorized)
    }

    pub fn wallet(&self, player_id: i64) -> Result<WalletBalances, TicketError> {
        let conn = self.lock_conn();
        wallet_in(&conn, player_id)
    }

    pub fn insert_design(
        &self,
        kind: TicketKind,
        name: &str,
        cost: Sc,
        slot_count: u32,
        win_probability: f64,
        prize_min: Sc,
        prize_max: Sc,
        enabled: bool,
    ) -> Result<TicketDesign, TicketError> {
        if !self.limits.allows_bet(cost) {
            return Err(TicketError::InvalidDesignConfiguration);
        }
        if slot_count == 0 || prize_min > prize_max || prize_max.is_zero() {
            return Err(TicketError::InvalidDesignConfiguration);
        }
        if !(0.0..=1.0).contains(&win_probability) {
            return Err(TicketError::InvalidDesignConfiguration);
        }
        let conn = self.lock_conn();
        conn.execute(
            "INSERT INTO designs (kind, name, cost, slot_count, win_probability, prize_min, prize_max, enabled)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                kind.as_str(),
                name,
                cost.cents(),
                slot_count,
                win_probability,
                prize_min.cents(),
                prize_max.cents(),
                enabled,
            ],
        )
        .map_err(TicketError::storage)?;
        let id = conn.last_insert_rowid();
        Ok(TicketDesign {
            id,
            kind,
            name: name.to_string(),
            cost,
            slot_count,
            win_probability,
            prize_min,
            prize_max,
            enabled,
        })
    }

    pub fn set_design_enabled(&self, design_id: i64, enabled: bool) -> Result<(), TicketError> {
        let conn = self.lock_conn();
        let changed = conn
            .execute(
                "UPDATE designs SET enabled = ? WHERE id = ?",
                params![enabled, design_id],
            )
            .map_err(TicketError::storage)?;
        if changed == 0 {
            return Err(TicketError::DesignNotFound);
        }
        Ok(())
    }

    /// Enabled designs of one family, catalog order.
    pub fn designs(&self, kind: TicketKind) -> Result<Vec<TicketDesign>, TicketError> {
        let conn = self.lock_conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, kind, name, cost, slot_count, win_probability, prize_min, prize_max, enabled
                 FROM designs WHERE kind = ? AND enabled = 1 ORDER BY id ASC",
            )
            .map_err(TicketError::storage)?;
        let rows = stmt
            .query_map(params![kind.as_str()], design_row)
            .map_err(TicketError::storage)?;
        let mut designs = Vec::new();
        for row in rows {
            designs.push(finish_design(row.map_err(TicketError::storage)?)?);
        }
        Ok(designs)
    }

    /// Atomic purchase: validate, generate the prize layout, create the
    /// ticket, debit the wallet, and append the ledger row in one
    /// transaction. A design of the other family is reported as not found,
    /// so each catalog route only sells its own tickets.
    pub fn purchase(
        &self,
        player_id: i64,
        design_id: i64,
        kind: TicketKind,
    ) -> Result<PurchaseOutcome, TicketError> {
        let now = unix_millis();
        let mut conn = self.lock_conn();
        let tx = conn.transaction().map_err(TicketError::storage)?;

        let design = design_in(&tx, design_id)?.ok_or(TicketError::DesignNotFound)?;
        if design.kind != kind {
            return Err(TicketError::DesignNotFound);
        }
        let balances = wallet_in(&tx, player_id)?;
        instawin_engine::validate_purchase(&design, &self.limits, balances.sweeps_coins)?;

        let (slots, ticket_number) = {
            let mut rng = self.lock_rng();
            let slots = instawin_engine::generate_slots(&design, &self.limits, &mut rng);
            let number = unused_ticket_number(&tx, now, &mut rng)?;
            (slots, number)
        };
        let slots_json = serde_json::to_string(&slots).map_err(TicketError::storage)?;

        tx.execute(
            "INSERT INTO tickets (ticket_number, kind, design_id, player_id, slots, status, claim_status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                ticket_number,
                design.kind.as_str(),
                design.id,
                player_id,
                slots_json,
                TicketStatus::Active.as_str(),
                ClaimStatus::Unclaimed.as_str(),
                now,
            ],
        )
        .map_err(TicketError::storage)?;
        let ticket_id = tx.last_insert_rowid();

        let balance_before = balances.sweeps_coins;
        let balance_after = balance_before
            .checked_sub(design.cost)
            .ok_or(TicketError::InsufficientFunds)?;
        tx.execute(
            "UPDATE wallets SET sweeps_coins = ? WHERE player_id = ?",
            params![balance_after.cents(), player_id],
        )
        .map_err(TicketError::storage)?;

        let description = format!("purchase: {} ({ticket_number})", design.name);
        let entry = append_ledger_row(
            &tx,
            player_id,
            ticket_id,
            EntryKind::Purchase,
            design.cost,
            balance_before,
            balance_after,
            &description,
            now,
        )?;

        tx.commit().map_err(TicketError::storage)?;

        let ticket = Ticket {
            id: ticket_id,
            ticket_number: ticket_number.clone(),
            kind: design.kind,
            design_id: design.id,
            player_id,
            slots,
            status: TicketStatus::Active,
            claim_status: ClaimStatus::Unclaimed,
            created_at: now,
            claimed_at: None,
        };
        let receipt = PurchaseReceipt {
            player_id,
            ticket_id,
            ticket_number,
            design_name: design.name.clone(),
            cost: design.cost,
        };
        Ok(PurchaseOutcome {
            ticket,
            entry,
            wallet: WalletBalances {
                gold_coins: balances.gold_coins,
                sweeps_coins: balance_after,
            },
            receipt,
        })
    }

    /// Reveal one slot. Never touches the wallet; only the slot's
    /// `revealed` flag changes.
    pub fn reveal(
        &self,
        player_id: i64,
        ticket_id: i64,
        index: u32,
    ) -> Result<RevealOutcome, TicketError> {
        let mut conn = self.lock_conn();
        let tx = conn.transaction().map_err(TicketError::storage)?;

        let mut ticket = ticket_in(&tx, player_id, ticket_id)?.ok_or(TicketError::TicketNotFound)?;
        let outcome = instawin_engine::reveal_slot(&mut ticket, index)?;

        let slots_json = serde_json::to_string(&ticket.slots).map_err(TicketError::storage)?;
        tx.execute(
            "UPDATE tickets SET slots = ? WHERE id = ?",
            params![slots_json, ticket_id],
        )
        .map_err(TicketError::storage)?;
        tx.commit().map_err(TicketError::storage)?;

        Ok(outcome)
    }

    /// Atomic, exactly-once claim: resolve the prize from stored state,
    /// flip the claim flag, credit the wallet, and append the ledger and
    /// won-result rows in one transaction.
    pub fn claim(&self, player_id: i64, ticket_id: i64) -> Result<ClaimOutcome, TicketError> {
        let now = unix_millis();
        let mut conn = self.lock_conn();
        let tx = conn.transaction().map_err(TicketError::storage)?;

        let ticket = ticket_in(&tx, player_id, ticket_id)?.ok_or(TicketError::TicketNotFound)?;
        let (winning_slot_index, prize) = instawin_engine::resolve_claim(&ticket, &self.limits)?;

        // The WHERE clause is the exactly-once guard: a concurrent claim
        // that committed first leaves zero rows to update here. The ticket
        // stays active for history; only the claim flag finalizes the payout.
        let changed = tx
            .execute(
                "UPDATE tickets SET claim_status = ?, claimed_at = ?
                 WHERE id = ? AND claim_status = ?",
                params![
                    ClaimStatus::Claimed.as_str(),
                    now,
                    ticket_id,
                    ClaimStatus::Unclaimed.as_str(),
                ],
            )
            .map_err(TicketError::storage)?;
        if changed == 0 {
            return Err(TicketError::AlreadyClaimed);
        }

        let balances = wallet_in(&tx, player_id)?;
        let balance_before = balances.sweeps_coins;
        let balance_after = balance_before
            .checked_add(prize)
            .ok_or_else(|| TicketError::storage("wallet balance overflow"))?;
        tx.execute(
            "UPDATE wallets SET sweeps_coins = ? WHERE player_id = ?",
            params![balance_after.cents(), player_id],
        )
        .map_err(TicketError::storage)?;

        let description = format!("claim: {} ({})", prize, ticket.ticket_number);
        let entry = append_ledger_row(
            &tx,
            player_id,
            ticket_id,
            EntryKind::Claim,
            prize,
            balance_before,
            balance_after,
            &description,
            now,
        )?;

        tx.execute(
            "INSERT INTO won_results (ticket_id, player_id, amount, slot_index, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                ticket_id,
                player_id,
                prize.cents(),
                winning_slot_index,
                now,
            ],
        )
        .map_err(TicketError::storage)?;

        tx.commit().map_err(TicketError::storage)?;

        Ok(ClaimOutcome {
            prize,
            winning_slot_index,
            entry,
            wallet: WalletBalances {
                gold_coins: balances.gold_coins,
                sweeps_coins: balance_after,
            },
        })
    }

    /// Ownership-scoped single-ticket lookup; foreign tickets are
    /// indistinguishable from missing ones.
    pub fn ticket(&self, player_id: i64, ticket_id: i64) -> Result<Ticket, TicketError> {
        let conn = self.lock_conn();
        ticket_in(&conn, player_id, ticket_id)?.ok_or(TicketError::TicketNotFound)
    }

    /// A player's tickets of one family, newest first.
    pub fn tickets_for(
        &self,
        player_id: i64,
        kind: TicketKind,
    ) -> Result<Vec<Ticket>, TicketError> {
        let conn = self.lock_conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, ticket_number, kind, design_id, player_id, slots, status, claim_status, created_at, claimed_at
                 FROM tickets WHERE player_id = ? AND kind = ? ORDER BY id DESC",
            )
            .map_err(TicketError::storage)?;
        let rows = stmt
            .query_map(params![player_id, kind.as_str()], ticket_row)
            .map_err(TicketError::storage)?;
        let mut tickets = Vec::new();
        for row in rows {
            tickets.push(finish_ticket(row.map_err(TicketError::storage)?)?);
        }
        Ok(tickets)
    }

    /// Most recent ledger entries for a player.
    pub fn ledger(&self, player_id: i64, limit: u32) -> Result<Vec<LedgerEntry>, TicketError> {
        let conn = self.lock_conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, player_id, ticket_id, entry, amount, balance_before, balance_after, description, created_at
                 FROM transactions WHERE player_id = ? ORDER BY id DESC LIMIT ?",
            )
            .map_err(TicketError::storage)?;
        let rows = stmt
            .query_map(params![player_id, limit], ledger_row)
            .map_err(TicketError::storage)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(finish_ledger(row.map_err(TicketError::storage)?)?);
        }
        Ok(entries)
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, TicketRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         PRAGMA foreign_keys=ON;
         CREATE TABLE IF NOT EXISTS players (
             id INTEGER PRIMARY KEY,
             name TEXT NOT NULL,
             token TEXT NOT NULL UNIQUE,
             created_at INTEGER NOT NULL
         );
         CREATE TABLE IF NOT EXISTS wallets (
             player_id INTEGER PRIMARY KEY REFERENCES players(id),
             gold_coins INTEGER NOT NULL,
             sweeps_coins INTEGER NOT NULL
         );
         CREATE TABLE IF NOT EXISTS designs (
             id INTEGER PRIMARY KEY,
             kind TEXT NOT NULL,
             name TEXT NOT NULL,
             cost INTEGER NOT NULL,
             slot_count INTEGER NOT NULL,
             win_probability REAL NOT NULL,
             prize_min INTEGER NOT NULL,
             prize_max INTEGER NOT NULL,
             enabled INTEGER NOT NULL DEFAULT 1
         );
         CREATE TABLE IF NOT EXISTS tickets (
             id INTEGER PRIMARY KEY,
             ticket_number TEXT NOT NULL UNIQUE,
             kind TEXT NOT NULL,
             design_id INTEGER NOT NULL REFERENCES designs(id),
             player_id INTEGER NOT NULL REFERENCES players(id),
             slots TEXT NOT NULL,
             status TEXT NOT NULL,
             claim_status TEXT NOT NULL,
             created_at INTEGER NOT NULL,
             claimed_at INTEGER
         );
         CREATE INDEX IF NOT EXISTS tickets_player_kind ON tickets(player_id, kind);
         CREATE TABLE IF NOT EXISTS transactions (
             id INTEGER PRIMARY KEY,
             player_id INTEGER NOT NULL REFERENCES players(id),
             ticket_id INTEGER NOT NULL REFERENCES tickets(id),
             entry TEXT NOT NULL,
             amount INTEGER NOT NULL,
             balance_before INTEGER NOT NULL,
             balance_after INTEGER NOT NULL,
             description TEXT NOT NULL,
             created_at INTEGER NOT NULL
         );
         CREATE INDEX IF NOT EXISTS transactions_player ON transactions(player_id);
         CREATE TABLE IF NOT EXISTS won_results (
             id INTEGER PRIMARY KEY,
             ticket_id INTEGER NOT NULL UNIQUE REFERENCES tickets(id),
             player_id INTEGER NOT NULL REFERENCES players(id),
             amount INTEGER NOT NULL,
             slot_index INTEGER NOT NULL,
             created_at INTEGER NOT NULL
         );",
    )
    .context("init ticket store schema")?;
    Ok(())
}

/// Collisions on the timestamp+random composite are negligible but checked
/// anyway; the UNIQUE constraint on `ticket_number` is the final backstop.
fn unused_ticket_number(
    tx: &Transaction<'_>,
    now_ms: u64,
    rng: &mut TicketRng,
) -> Result<String, TicketError> {
    for _ in 0..4 {
        let number = instawin_engine::ticket_number(now_ms, rng);
        let taken: Option<i64> = tx
            .query_row(
                "SELECT id FROM tickets WHERE ticket_number = ?",
                params![number],
                |row| row.get(0),
            )
            .optional()
            .map_err(TicketError::storage)?;
        if taken.is_none() {
            return Ok(number);
        }
    }
    Err(TicketError::storage("ticket number space exhausted"))
}

fn wallet_in(conn: &Connection, player_id: i64) -> Result<WalletBalances, TicketError> {
    let row: Option<(u64, u64)> = conn
        .query_row(
            "SELECT gold_coins, sweeps_coins FROM wallets WHERE player_id = ?",
            params![player_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(TicketError::storage)?;
    let (gold, sweeps) = row.ok_or(TicketError::Unauthorized)?;
    Ok(WalletBalances {
        gold_coins: Sc::from_cents(gold),
        sweeps_coins: Sc::from_cents(sweeps),
    })
}

type DesignRow = (i64, String, String, u64, u32, f64, u64, u64, bool);

fn design_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DesignRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn finish_design(row: DesignRow) -> Result<TicketDesign, TicketError> {
    let (id, kind, name, cost, slot_count, win_probability, prize_min, prize_max, enabled) = row;
    Ok(TicketDesign {
        id,
        kind: kind.parse().map_err(TicketError::storage)?,
        name,
        cost: Sc::from_cents(cost),
        slot_count,
        win_probability,
        prize_min: Sc::from_cents(prize_min),
        prize_max: Sc::from_cents(prize_max),
        enabled,
    })
}

fn design_in(conn: &Connection, design_id: i64) -> Result<Option<TicketDesign>, TicketError> {
    let row = conn
        .query_row(
            "SELECT id, kind, name, cost, slot_count, win_probability, prize_min, prize_max, enabled
             FROM designs WHERE id = ?",
            params![design_id],
            design_row,
        )
        .optional()
        .map_err(TicketError::storage)?;
    row.map(finish_design).transpose()
}

type TicketRow = (
    i64,
    String,
    String,
    i64,
    i64,
    String,
    String,
    String,
    u64,
    Option<u64>,
);

fn ticket_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TicketRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn finish_ticket(row: TicketRow) -> Result<Ticket, TicketError> {
    let (id, ticket_number, kind, design_id, player_id, slots, status, claim_status, created_at, claimed_at) =
        row;
    let slots: Vec<Slot> = serde_json::from_str(&slots).map_err(TicketError::storage)?;
    let status = match status.as_str() {
        "active" => TicketStatus::Active,
        "expired" => TicketStatus::Expired,
        "claimed" => TicketStatus::Claimed,
        other => return Err(TicketError::storage(format!("unknown ticket status: {other}"))),
    };
    let claim_status = match claim_status.as_str() {
        "unclaimed" => ClaimStatus::Unclaimed,
        "claimed" => ClaimStatus::Claimed,
        other => return Err(TicketError::storage(format!("unknown claim status: {other}"))),
    };
    Ok(Ticket {
        id,
        ticket_number,
        kind: kind.parse().map_err(TicketError::storage)?,
        design_id,
        player_id,
        slots,
        status,
        claim_status,
        created_at,
        claimed_at,
    })
}

fn ticket_in(
    conn: &Connection,
    player_id: i64,
    ticket_id: i64,
) -> Result<Option<Ticket>, TicketError> {
    let row = conn
        .query_row(
            "SELECT id, ticket_number, kind, design_id, player_id, slots, status, claim_status, created_at, claimed_at
             FROM tickets WHERE id = ? AND player_id = ?",
            params![ticket_id, player_id],
            ticket_row,
        )
        .optional()
        .map_err(TicketError::storage)?;
    row.map(finish_ticket).transpose()
}

type LedgerRow = (i64, i64, i64, String, u64, u64, u64, String, u64);

fn ledger_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LedgerRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn finish_ledger(row: LedgerRow) -> Result<LedgerEntry, TicketError> {
    let (id, player_id, ticket_id, entry, amount, balance_before, balance_after, description, created_at) =
        row;
    Ok(LedgerEntry {
        id,
        player_id,
        ticket_id,
        entry: entry.parse().map_err(TicketError::storage)?,
        amount: Sc::from_cents(amount),
        balance_before: Sc::from_cents(balance_before),
        balance_after: Sc::from_cents(balance_after),
        description,
        created_at,
    })
}

#[allow(clippy::too_many_arguments)]
fn append_ledger_row(
    tx: &Transaction<'_>,
    player_id: i64,
    ticket_id: i64,
    entry: EntryKind,
    amount: Sc,
    balance_before: Sc,
    balance_after: Sc,
    description: &str,
    now: u64,
) -> Result<LedgerEntry, TicketError> {
    tx.execute(
        "INSERT INTO transactions (player_id, ticket_id, entry, amount, balance_before, balance_after, description, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            player_id,
            ticket_id,
            entry.as_str(),
            amount.cents(),
            balance_before.cents(),
            balance_after.cents(),
            description,
            now,
        ],
    )
    .map_err(TicketError::storage)?;
    Ok(LedgerEntry {
        id: tx.last_insert_rowid(),
        player_id,
        ticket_id,
        entry,
        amount,
        balance_before,
        balance_after,
        description: description.to_string(),
        created_at: now,
    })
}
