use soroban_sdk::{contracterror, contracttype, Address, String, Vec};

// Storage keys for instance data
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Owner,
    Paused,
    Locked,
    Terms,
    Ledger,
}

// Storage keys for persistent data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Allowlist,
    Allowlisted(Address),
    Pledgers,
    EarlyPledgers,
    AmountPledged(Address),
    EarlyPledger(Address),
    Refunded(Address),
}

// Numeric values match the escrow states Active, Refunding, Closed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum CampaignState {
    Active = 0,
    RefundsEnabled = 1,
    Closed = 2,
}

/// Parameters supplied once, at initialization.
#[derive(Clone, Debug)]
#[contracttype]
pub struct CampaignConfig {
    pub token: Address,
    pub beneficiary: Address,
    pub title: String,
    pub target_amount: i128,
    pub refund_bonus: i128,
    pub campaign_length_days: u32,
    pub min_pledge_amount: i128,
    pub max_early_pledgers: u32,
    pub allowlist: Vec<Address>,
}

/// Immutable campaign terms derived from a validated [`CampaignConfig`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CampaignTerms {
    pub token: Address,
    pub beneficiary: Address,
    pub title: String,
    pub target_amount: i128,
    pub refund_bonus: i128,
    pub created_at: u64,
    pub expiry_timestamp: u64,
    pub min_pledge_amount: i128,
    pub max_early_pledgers: u32,
}

/// Mutable accounting totals, loaded and stored as one record.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CampaignLedger {
    pub state: CampaignState,
    pub total_pledged: i128,
    pub total_refunded: i128,
    pub refunds_paid: u32,
    pub bonus_paid: i128,
    pub bonus_reclaimed: i128,
    pub released_to_beneficiary: i128,
}

impl Default for CampaignLedger {
    fn default() -> Self {
        CampaignLedger {
            state: CampaignState::Active,
            total_pledged: 0,
            total_refunded: 0,
            refunds_paid: 0,
            bonus_paid: 0,
            bonus_reclaimed: 0,
            released_to_beneficiary: 0,
        }
    }
}

impl CampaignLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CampaignInfo {
    pub beneficiary: Address,
    pub target_amount: i128,
    pub expiry_timestamp: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct FundingStatus {
    pub total_pledged: i128,
    pub percent_of_goal: i128,
    pub goal_met: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct RefundStatus {
    pub amount_refunded: i128,
    pub percent_refunded: i128,
    pub amount_not_refunded: i128,
    pub refunds_completed: bool,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CampaignError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    GoalMustExceedBonus = 3,
    ValueMustEqualBonus = 4,
    InvalidAmount = 5,
    NotOwner = 6,
    Paused = 7,
    NotPaused = 8,
    CampaignHasExpired = 9,
    CampaignIsStillActive = 10,
    SuccessfulCampaignNoRefunds = 11,
    CampaignGoalIsNotMet = 12,
    CampaignNotActive = 13,
    RefundsNotEnabled = 14,
    CampaignNotClosed = 15,
    /// Bonus residue can only be reclaimed once every pledger is refunded.
    RefundsNotCompleted = 16,
    AddressNotOnAllowlist = 17,
    AddressIsNotAPledger = 18,
    InsufficientFunds = 19,
    RefundAlreadyWithdrawn = 20,
    Reentrancy = 21,
    ArithmeticOverflow = 22,
}

// Constants
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const PERCENT: i128 = 100;
pub const TTL_INSTANCE: u32 = 17280 * 30; // 30 days
pub const TTL_PERSISTENT: u32 = 17280 * 90; // 90 days
