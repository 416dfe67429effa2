#![no_std]

mod accounting;
mod events;
mod storage_types;


pub use storage_types::{
    CampaignConfig, CampaignError, CampaignInfo, CampaignLedger, CampaignState, CampaignTerms,
    FundingStatus, RefundStatus,
};
use storage_types::{DataKey, PersistentKey, TTL_INSTANCE, TTL_PERSISTENT};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};

#[contract]
pub struct CampaignContract;

#[contractimpl]
impl CampaignContract {
    /// Open the campaign and lock the early-pledger bonus pool.
    ///
    /// `bonus_deposit` is pulled from `owner` and must equal
    /// `config.refund_bonus` exactly.
    pub fn initialize(
        e: Env,
        owner: Address,
        config: CampaignConfig,
        bonus_deposit: i128,
    ) -> Result<(), CampaignError> {
        if e.storage().instance().has(&DataKey::Terms) {
            return Err(CampaignError::AlreadyInitialized);
        }
        if config.refund_bonus >= config.target_amount {
            return Err(CampaignError::GoalMustExceedBonus);
        }
        if bonus_deposit != config.refund_bonus {
            return Err(CampaignError::ValueMustEqualBonus);
        }
        if config.refund_bonus < 0 || config.min_pledge_amount <= 0 {
            return Err(CampaignError::InvalidAmount);
        }

        owner.require_auth();

        let now = e.ledger().timestamp();
        let terms = CampaignTerms {
            token: config.token,
            beneficiary: config.beneficiary,
            title: config.title,
            target_amount: config.target_amount,
            refund_bonus: config.refund_bonus,
            created_at: now,
            expiry_timestamp: accounting::expiry_from(now, config.campaign_length_days)?,
            min_pledge_amount: config.min_pledge_amount,
            max_early_pledgers: config.max_early_pledgers,
        };

        if bonus_deposit > 0 {
            let token_client = token::Client::new(&e, &terms.token);
            token_client.transfer(&owner, &e.current_contract_address(), &bonus_deposit);
        }

        e.storage().instance().set(&DataKey::Owner, &owner);
        e.storage().instance().set(&DataKey::Paused, &false);
        e.storage().instance().set(&DataKey::Terms, &terms);
        write_ledger(&e, &CampaignLedger::new());

        let mut allowlist: Vec<Address> = Vec::new(&e);
        for address in config.allowlist.iter() {
            let key = PersistentKey::Allowlisted(address.clone());
            if e.storage().persistent().has(&key) {
                continue;
            }
            e.storage().persistent().set(&key, &true);
            extend_persistent(&e, &key);
            allowlist.push_back(address);
        }
        write_addresses(&e, PersistentKey::Allowlist, &allowlist);
        write_addresses(&e, PersistentKey::Pledgers, &Vec::new(&e));
        write_addresses(&e, PersistentKey::EarlyPledgers, &Vec::new(&e));

        log!(&e, "campaign initialized", terms.target_amount, terms.expiry_timestamp);

        events::emit_initialized(
            &e,
            events::CampaignInitializedEvent {
                owner,
                beneficiary: terms.beneficiary,
                title: terms.title,
                target_amount: terms.target_amount,
                refund_bonus: terms.refund_bonus,
                expiry_timestamp: terms.expiry_timestamp,
            },
        );

        Ok(())
    }

    /// Pledge `amount` on behalf of `depositor`, who must authorize the call.
    pub fn deposit(e: Env, depositor: Address, amount: i128) -> Result<(), CampaignError> {
        depositor.require_auth();
        let terms = read_terms(&e)?;
        check_not_paused(&e)?;
        check_unlocked(&e)?;

        if e.ledger().timestamp() > terms.expiry_timestamp {
            return Err(CampaignError::CampaignHasExpired);
        }
        if !is_on_allowlist(&e, &depositor) {
            return Err(CampaignError::AddressNotOnAllowlist);
        }
        if amount < terms.min_pledge_amount {
            return Err(CampaignError::InsufficientFunds);
        }

        let mut ledger = read_ledger(&e)?;
        if ledger.state != CampaignState::Active {
            return Err(CampaignError::CampaignNotActive);
        }

        let pledged_key = PersistentKey::AmountPledged(depositor.clone());
        let previous: i128 = e.storage().persistent().get(&pledged_key).unwrap_or(0);

        // Every accepted deposit is positive, so a zero balance means the
        // depositor is not yet in `pledgers`.
        if previous == 0 {
            let mut early_pledgers = read_addresses(&e, PersistentKey::EarlyPledgers);
            if early_pledgers.len() < terms.max_early_pledgers {
                early_pledgers.push_back(depositor.clone());
                write_addresses(&e, PersistentKey::EarlyPledgers, &early_pledgers);

                let early_key = PersistentKey::EarlyPledger(depositor.clone());
                e.storage().persistent().set(&early_key, &true);
                extend_persistent(&e, &early_key);
            }

            let mut pledgers = read_addresses(&e, PersistentKey::Pledgers);
            pledgers.push_back(depositor.clone());
            write_addresses(&e, PersistentKey::Pledgers, &pledgers);
        }

        let pledged = previous
            .checked_add(amount)
            .ok_or(CampaignError::ArithmeticOverflow)?;
        e.storage().persistent().set(&pledged_key, &pledged);
        extend_persistent(&e, &pledged_key);

        ledger.total_pledged = ledger
            .total_pledged
            .checked_add(amount)
            .ok_or(CampaignError::ArithmeticOverflow)?;
        write_ledger(&e, &ledger);

        let token_client = token::Client::new(&e, &terms.token);
        token_client.transfer(&depositor, &e.current_contract_address(), &amount);

        events::emit_pledge(
            &e,
            events::PledgeEvent {
                pledger: depositor.clone(),
                amount,
                total_pledged: ledger.total_pledged,
                early_pledger: read_flag(&e, PersistentKey::EarlyPledger(depositor)),
            },
        );

        if accounting::goal_met(&ledger, terms.target_amount) {
            log!(&e, "campaign goal met", ledger.total_pledged, terms.target_amount);
            events::emit_goal_met(
                &e,
                events::GoalMetEvent {
                    total_pledged: ledger.total_pledged,
                    target_amount: terms.target_amount,
                },
            );
        }

        Ok(())
    }

    /// Switch a failed campaign into the refund phase (owner only).
    pub fn enable_refunds(e: Env, caller: Address) -> Result<(), CampaignError> {
        require_owner(&e, &caller)?;
        check_not_paused(&e)?;
        let terms = read_terms(&e)?;
        let mut ledger = read_ledger(&e)?;

        if ledger.state != CampaignState::Active {
            return Err(CampaignError::CampaignNotActive);
        }
        if e.ledger().timestamp() <= terms.expiry_timestamp {
            return Err(CampaignError::CampaignIsStillActive);
        }
        if accounting::goal_met(&ledger, terms.target_amount) {
            return Err(CampaignError::SuccessfulCampaignNoRefunds);
        }

        ledger.state = CampaignState::RefundsEnabled;
        write_ledger(&e, &ledger);

        let early_pledgers = read_addresses(&e, PersistentKey::EarlyPledgers).len();
        log!(&e, "refunds enabled", ledger.total_pledged, early_pledgers);

        events::emit_refunds_enabled(
            &e,
            events::RefundsEnabledEvent {
                total_pledged: ledger.total_pledged,
                early_pledgers,
            },
        );

        Ok(())
    }

    /// Close a successful campaign so the beneficiary can withdraw (owner only).
    pub fn close(e: Env, caller: Address) -> Result<(), CampaignError> {
        require_owner(&e, &caller)?;
        check_not_paused(&e)?;
        let terms = read_terms(&e)?;
        let mut ledger = read_ledger(&e)?;

        if ledger.state != CampaignState::Active {
            return Err(CampaignError::CampaignNotActive);
        }
        if !accounting::goal_met(&ledger, terms.target_amount) {
            return Err(CampaignError::CampaignGoalIsNotMet);
        }
        if e.ledger().timestamp() <= terms.expiry_timestamp {
            return Err(CampaignError::CampaignIsStillActive);
        }

        ledger.state = CampaignState::Closed;
        write_ledger(&e, &ledger);

        log!(&e, "campaign closed", ledger.total_pledged);

        events::emit_closed(
            &e,
            events::ClosedEvent {
                beneficiary: terms.beneficiary,
                total_pledged: ledger.total_pledged,
            },
        );

        Ok(())
    }

    /// Refund the caller's pledge, plus a bonus share for early pledgers.
    pub fn withdraw(e: Env, pledger: Address) -> Result<i128, CampaignError> {
        pledger.require_auth();
        let terms = read_terms(&e)?;
        check_not_paused(&e)?;
        check_unlocked(&e)?;

        let mut ledger = read_ledger(&e)?;
        if ledger.state != CampaignState::RefundsEnabled {
            return Err(CampaignError::RefundsNotEnabled);
        }

        let pledged: i128 = e
            .storage()
            .persistent()
            .get(&PersistentKey::AmountPledged(pledger.clone()))
            .unwrap_or(0);
        if pledged <= 0 {
            return Err(CampaignError::AddressIsNotAPledger);
        }

        let refunded_key = PersistentKey::Refunded(pledger.clone());
        if read_flag(&e, refunded_key.clone()) {
            return Err(CampaignError::RefundAlreadyWithdrawn);
        }

        let is_early = read_flag(&e, PersistentKey::EarlyPledger(pledger.clone()));
        let early_count = read_addresses(&e, PersistentKey::EarlyPledgers).len();
        let (payout, bonus) =
            accounting::refund_payout(pledged, is_early, terms.refund_bonus, early_count)?;

        // Record the refund before any value leaves the contract.
        e.storage().persistent().set(&refunded_key, &true);
        extend_persistent(&e, &refunded_key);

        ledger.total_refunded = ledger
            .total_refunded
            .checked_add(pledged)
            .ok_or(CampaignError::ArithmeticOverflow)?;
        ledger.bonus_paid = ledger
            .bonus_paid
            .checked_add(bonus)
            .ok_or(CampaignError::ArithmeticOverflow)?;
        ledger.refunds_paid += 1;
        write_ledger(&e, &ledger);

        transfer_out(&e, &terms.token, &pledger, payout);

        log!(&e, "refund withdrawn", pledger.clone(), payout);

        events::emit_withdrawn(
            &e,
            events::WithdrawnEvent {
                pledger,
                amount: payout,
                bonus,
            },
        );

        Ok(payout)
    }

    /// Send the pledged principal of a closed campaign to the beneficiary.
    pub fn beneficiary_withdraw(e: Env) -> Result<i128, CampaignError> {
        let terms = read_terms(&e)?;
        terms.beneficiary.require_auth();
        check_not_paused(&e)?;
        check_unlocked(&e)?;

        let mut ledger = read_ledger(&e)?;
        if ledger.state != CampaignState::Closed {
            return Err(CampaignError::CampaignNotClosed);
        }

        let amount = ledger
            .total_pledged
            .checked_sub(ledger.released_to_beneficiary)
            .ok_or(CampaignError::ArithmeticOverflow)?;
        if amount <= 0 {
            return Err(CampaignError::InsufficientFunds);
        }

        ledger.released_to_beneficiary = ledger.total_pledged;
        write_ledger(&e, &ledger);

        transfer_out(&e, &terms.token, &terms.beneficiary, amount);

        log!(&e, "funds sent to beneficiary", amount);

        events::emit_funds_sent(
            &e,
            events::FundsSentEvent {
                beneficiary: terms.beneficiary,
                amount,
            },
        );

        Ok(amount)
    }

    /// Return the part of the bonus pool no pledger can claim (owner only).
    pub fn reclaim_bonus(e: Env, caller: Address) -> Result<i128, CampaignError> {
        require_owner(&e, &caller)?;
        check_not_paused(&e)?;
        check_unlocked(&e)?;
        let terms = read_terms(&e)?;
        let mut ledger = read_ledger(&e)?;

        let pledger_count = read_addresses(&e, PersistentKey::Pledgers).len();
        let amount = accounting::reclaimable_bonus(&ledger, terms.refund_bonus, pledger_count)?;
        if amount <= 0 {
            return Err(CampaignError::InsufficientFunds);
        }

        ledger.bonus_reclaimed = ledger
            .bonus_reclaimed
            .checked_add(amount)
            .ok_or(CampaignError::ArithmeticOverflow)?;
        write_ledger(&e, &ledger);

        transfer_out(&e, &terms.token, &caller, amount);

        log!(&e, "bonus reclaimed", amount);

        events::emit_bonus_reclaimed(
            &e,
            events::BonusReclaimedEvent {
                owner: caller,
                amount,
            },
        );

        Ok(amount)
    }

    pub fn pause_campaign(e: Env, caller: Address) -> Result<(), CampaignError> {
        require_owner(&e, &caller)?;
        if read_paused(&e) {
            return Err(CampaignError::Paused);
        }
        e.storage().instance().set(&DataKey::Paused, &true);
        extend_instance(&e);

        log!(&e, "campaign paused");
        events::emit_paused(&e, caller, true);
        Ok(())
    }

    pub fn unpause_campaign(e: Env, caller: Address) -> Result<(), CampaignError> {
        require_owner(&e, &caller)?;
        if !read_paused(&e) {
            return Err(CampaignError::NotPaused);
        }
        e.storage().instance().set(&DataKey::Paused, &false);
        extend_instance(&e);

        log!(&e, "campaign unpaused");
        events::emit_paused(&e, caller, false);
        Ok(())
    }

    pub fn transfer_ownership(
        e: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), CampaignError> {
        require_owner(&e, &caller)?;
        e.storage().instance().set(&DataKey::Owner, &new_owner);
        extend_instance(&e);

        events::emit_ownership_transferred(
            &e,
            events::OwnershipTransferredEvent {
                previous_owner: caller,
                new_owner,
            },
        );
        Ok(())
    }

    // View functions
    pub fn get_campaign_info(e: Env) -> Result<CampaignInfo, CampaignError> {
        let terms = read_terms(&e)?;
        Ok(CampaignInfo {
            beneficiary: terms.beneficiary,
            target_amount: terms.target_amount,
            expiry_timestamp: terms.expiry_timestamp,
        })
    }

    pub fn get_campaign_funding_status(e: Env) -> Result<FundingStatus, CampaignError> {
        let terms = read_terms(&e)?;
        let ledger = read_ledger(&e)?;
        Ok(FundingStatus {
            total_pledged: ledger.total_pledged,
            percent_of_goal: accounting::percent_of(ledger.total_pledged, terms.target_amount)?,
            goal_met: accounting::goal_met(&ledger, terms.target_amount),
        })
    }

    /// Token balance currently held by the campaign, bonus pool included.
    pub fn get_balance(e: Env) -> Result<i128, CampaignError> {
        let terms = read_terms(&e)?;
        let token_client = token::Client::new(&e, &terms.token);
        Ok(token_client.balance(&e.current_contract_address()))
    }

    pub fn get_pledgers(e: Env) -> Vec<Address> {
        read_addresses(&e, PersistentKey::Pledgers)
    }

    pub fn get_early_pledgers(e: Env) -> Vec<Address> {
        read_addresses(&e, PersistentKey::EarlyPledgers)
    }

    pub fn get_amount_pledged(e: Env, pledger: Address) -> i128 {
        e.storage()
            .persistent()
            .get(&PersistentKey::AmountPledged(pledger))
            .unwrap_or(0)
    }

    pub fn get_refund_status(e: Env) -> Result<RefundStatus, CampaignError> {
        let ledger = read_ledger(&e)?;
        let pledger_count = read_addresses(&e, PersistentKey::Pledgers).len();
        Ok(RefundStatus {
            amount_refunded: ledger.total_refunded,
            percent_refunded: accounting::percent_of(ledger.total_refunded, ledger.total_pledged)?,
            amount_not_refunded: ledger
                .total_pledged
                .checked_sub(ledger.total_refunded)
                .ok_or(CampaignError::ArithmeticOverflow)?,
            refunds_completed: accounting::refunds_completed(&ledger, pledger_count),
        })
    }

    pub fn get_config(e: Env) -> Result<CampaignTerms, CampaignError> {
        read_terms(&e)
    }

    pub fn get_state(e: Env) -> Result<CampaignState, CampaignError> {
        Ok(read_ledger(&e)?.state)
    }

    pub fn get_owner(e: Env) -> Result<Address, CampaignError> {
        e.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(CampaignError::NotInitialized)
    }

    pub fn is_paused(e: Env) -> bool {
        read_paused(&e)
    }

    pub fn get_allowlist(e: Env) -> Vec<Address> {
        read_addresses(&e, PersistentKey::Allowlist)
    }

    pub fn is_allowlisted(e: Env, address: Address) -> bool {
        is_on_allowlist(&e, &address)
    }

    pub fn is_early_pledger(e: Env, pledger: Address) -> bool {
        read_flag(&e, PersistentKey::EarlyPledger(pledger))
    }

    pub fn has_received_refund(e: Env, pledger: Address) -> bool {
        read_flag(&e, PersistentKey::Refunded(pledger))
    }
}

// Helper functions
fn extend_instance(e: &Env) {
    e.storage().instance().extend_ttl(TTL_INSTANCE, TTL_INSTANCE);
}

fn extend_persistent(e: &Env, key: &PersistentKey) {
    e.storage()
        .persistent()
        .extend_ttl(key, TTL_PERSISTENT, TTL_PERSISTENT);
}

fn read_terms(e: &Env) -> Result<CampaignTerms, CampaignError> {
    e.storage()
        .instance()
        .get(&DataKey::Terms)
        .ok_or(CampaignError::NotInitialized)
}

fn read_ledger(e: &Env) -> Result<CampaignLedger, CampaignError> {
    e.storage()
        .instance()
        .get(&DataKey::Ledger)
        .ok_or(CampaignError::NotInitialized)
}

fn write_ledger(e: &Env, ledger: &CampaignLedger) {
    e.storage().instance().set(&DataKey::Ledger, ledger);
    extend_instance(e);
}

fn read_addresses(e: &Env, key: PersistentKey) -> Vec<Address> {
    e.storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(e))
}

fn write_addresses(e: &Env, key: PersistentKey, addresses: &Vec<Address>) {
    e.storage().persistent().set(&key, addresses);
    extend_persistent(e, &key);
}

fn read_flag(e: &Env, key: PersistentKey) -> bool {
    e.storage().persistent().get(&key).unwrap_or(false)
}

fn is_on_allowlist(e: &Env, address: &Address) -> bool {
    read_flag(e, PersistentKey::Allowlisted(address.clone()))
}

fn read_paused(e: &Env) -> bool {
    e.storage().instance().get(&DataKey::Paused).unwrap_or(false)
}

fn check_not_paused(e: &Env) -> Result<(), CampaignError> {
    if read_paused(e) {
        return Err(CampaignError::Paused);
    }
    Ok(())
}

fn check_unlocked(e: &Env) -> Result<(), CampaignError> {
    if e.storage().instance().has(&DataKey::Locked) {
        return Err(CampaignError::Reentrancy);
    }
    Ok(())
}

fn require_owner(e: &Env, caller: &Address) -> Result<(), CampaignError> {
    let owner: Address = e
        .storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(CampaignError::NotInitialized)?;
    if *caller != owner {
        return Err(CampaignError::NotOwner);
    }
    caller.require_auth();
    Ok(())
}

/// Move value out of the contract while holding the reentrancy lock.
/// Callers persist their bookkeeping before calling this.
fn transfer_out(e: &Env, token_address: &Address, recipient: &Address, amount: i128) {
    e.storage().instance().set(&DataKey::Locked, &true);
    let token_client = token::Client::new(e, token_address);
    token_client.transfer(&e.current_contract_address(), recipient, &amount);
    e.storage().instance().remove(&DataKey::Locked);
}
