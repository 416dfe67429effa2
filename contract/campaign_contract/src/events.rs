use soroban_sdk::{contracttype, Address, Env, String, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignInitializedEvent {
    pub owner: Address,
    pub beneficiary: Address,
    pub title: String,
    pub target_amount: i128,
    pub refund_bonus: i128,
    pub expiry_timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PledgeEvent {
    pub pledger: Address,
    pub amount: i128,
    pub total_pledged: i128,
    pub early_pledger: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GoalMetEvent {
    pub total_pledged: i128,
    pub target_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundsEnabledEvent {
    pub total_pledged: i128,
    pub early_pledgers: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClosedEvent {
    pub beneficiary: Address,
    pub total_pledged: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub pledger: Address,
    pub amount: i128,
    pub bonus: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsSentEvent {
    pub beneficiary: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusReclaimedEvent {
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

pub fn emit_initialized(env: &Env, event: CampaignInitializedEvent) {
    env.events()
        .publish((Symbol::new(env, "initialized"),), event);
}

pub fn emit_pledge(env: &Env, event: PledgeEvent) {
    env.events().publish((Symbol::new(env, "pledge"),), event);
}

pub fn emit_goal_met(env: &Env, event: GoalMetEvent) {
    env.events().publish((Symbol::new(env, "goal_met"),), event);
}

pub fn emit_refunds_enabled(env: &Env, event: RefundsEnabledEvent) {
    env.events()
        .publish((Symbol::new(env, "refunds_enabled"),), event);
}

pub fn emit_closed(env: &Env, event: ClosedEvent) {
    env.events().publish((Symbol::new(env, "closed"),), event);
}

pub fn emit_withdrawn(env: &Env, event: WithdrawnEvent) {
    env.events().publish((Symbol::new(env, "withdrawn"),), event);
}

pub fn emit_funds_sent(env: &Env, event: FundsSentEvent) {
    env.events().publish((Symbol::new(env, "funds_sent"),), event);
}

pub fn emit_bonus_reclaimed(env: &Env, event: BonusReclaimedEvent) {
    env.events()
        .publish((Symbol::new(env, "bonus_reclaimed"),), event);
}

pub fn emit_paused(env: &Env, owner: Address, paused: bool) {
    let topic = if paused { "paused" } else { "unpaused" };
    env.events().publish((Symbol::new(env, topic),), owner);
}

pub fn emit_ownership_transferred(env: &Env, event: OwnershipTransferredEvent) {
    env.events()
        .publish((Symbol::new(env, "ownership_transferred"),), event);
}
