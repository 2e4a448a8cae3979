// ── Subnet allocation store ──
//
// Owns the live subnet list and funnels every mutation through the
// injected repository. A mutation is computed on a private copy, handed
// to the repository, and only published in memory once it was accepted,
// so a failed write leaves nothing behind.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use super::collection::{EntityCollection, Snapshot};
use super::repository::SubnetRepository;
use crate::cidr::{Cidr, parse_addr};
use crate::command::{
    ColorGroupInput, Command, CommandResult, CreateSubnetRequest, DhcpRangeRequest,
    UpdateSubnetRequest,
};
use crate::error::CoreError;
use crate::generate::generate_addresses;
use crate::model::{
    AddressStatus, AddressUpdate, ColorGroup, EntityId, GATEWAY_DEVICE, GATEWAY_HOSTNAME, Subnet,
    SubnetSummary,
};
use crate::range::DhcpRange;
use crate::stats::{NetworkStats, aggregate};

/// Behavior switches for a [`SubnetStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Require both DHCP endpoints to lie inside the subnet's block.
    pub enforce_dhcp_bounds: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            enforce_dhcp_bounds: true,
        }
    }
}

/// The allocation store: one per process or session.
///
/// Mutations on the same subnet are serialized by a per-subnet lock;
/// mutations on different subnets run independently. Creation holds a
/// store-wide lock so the duplicate-CIDR check and the insert are atomic.
pub struct SubnetStore<R: SubnetRepository> {
    repo: R,
    options: StoreOptions,
    subnets: EntityCollection<Subnet>,
    locks: DashMap<EntityId, Arc<Mutex<()>>>,
    create_lock: Mutex<()>,
}

impl<R: SubnetRepository> SubnetStore<R> {
    /// An empty store. Nothing is read from `repo`.
    pub fn new(repo: R, options: StoreOptions) -> Self {
        Self {
            repo,
            options,
            subnets: EntityCollection::new(),
            locks: DashMap::new(),
            create_lock: Mutex::new(()),
        }
    }

    /// Build a store from everything `repo` currently holds.
    ///
    /// Each record's used count is re-derived from its address list.
    pub async fn open(repo: R, options: StoreOptions) -> Result<Self, CoreError> {
        let loaded = repo
            .load_all()
            .await
            .map_err(|e| CoreError::persistence("load subnets", e))?;

        let store = Self::new(repo, options);
        for mut subnet in loaded {
            let counted = subnet.count_used();
            if counted != subnet.used_ips {
                warn!(
                    subnet = %subnet.id,
                    recorded = subnet.used_ips,
                    counted,
                    "used count out of sync with address list, correcting"
                );
                subnet.used_ips = counted;
            }
            store.subnets.upsert(subnet.id.clone(), subnet);
        }

        info!(subnets = store.len(), "subnet store opened");
        Ok(store)
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn get(&self, id: &EntityId) -> Option<Arc<Subnet>> {
        self.subnets.get(id)
    }

    /// Every subnet in creation order.
    pub fn list(&self) -> Snapshot<Subnet> {
        self.subnets.snapshot()
    }

    pub fn summaries(&self) -> Vec<SubnetSummary> {
        self.list().iter().map(|s| s.summary()).collect()
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    /// Network-wide totals over the current subnets.
    pub fn stats(&self) -> NetworkStats {
        let snapshot = self.list();
        aggregate(snapshot.iter().map(AsRef::as_ref))
    }

    /// Watch the subnet list; a new snapshot is published after every
    /// successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Subnet>> {
        self.subnets.subscribe()
    }

    // ── Subnet lifecycle ─────────────────────────────────────────────

    pub async fn create(&self, request: CreateSubnetRequest) -> Result<Subnet, CoreError> {
        let CreateSubnetRequest { name, cidr, gateway } = request;
        let name = subnet_name(&name)?;
        let block = Cidr::parse(&cidr)?;
        let gateway = parse_gateway(gateway.as_deref())?;

        let _guard = self.create_lock.lock().await;
        if self.subnets.any(|s| s.cidr == cidr) {
            return Err(CoreError::DuplicateCidr { cidr });
        }

        let space = generate_addresses(&block);
        let mut subnet = Subnet {
            id: EntityId::generate(),
            name,
            cidr,
            mask: block.mask_string(),
            gateway,
            total_ips: block.total_ips(),
            used_ips: 0,
            addresses: space.addresses,
            dhcp_range: None,
            color_groups: Vec::new(),
            truncated: space.truncated,
        };

        if let Some(gw) = gateway {
            let slot = subnet
                .addresses
                .iter_mut()
                .find(|a| a.address == gw && !a.is_reserved());
            if let Some(slot) = slot {
                slot.status = AddressStatus::Used;
                slot.hostname = Some(GATEWAY_HOSTNAME.into());
                slot.device = Some(GATEWAY_DEVICE.into());
                slot.last_modified = Some(Utc::now());
                subnet.used_ips = 1;
            } else {
                debug!(gateway = %gw, cidr = %subnet.cidr, "gateway not among generated addresses");
            }
        }

        self.persist(&subnet, "save new subnet").await?;
        self.subnets.upsert(subnet.id.clone(), subnet.clone());

        info!(
            subnet = %subnet.id,
            cidr = %subnet.cidr,
            truncated = subnet.truncated,
            "subnet created"
        );
        Ok(subnet)
    }

    /// Change name and/or gateway. The CIDR never changes.
    pub async fn update(
        &self,
        id: &EntityId,
        request: UpdateSubnetRequest,
    ) -> Result<Subnet, CoreError> {
        let name = request.name.as_deref().map(subnet_name).transpose()?;
        let gateway = match request.gateway.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(text) => Some(Some(parse_addr(text)?)),
        };

        self.mutate(id, "save subnet settings", |subnet| {
            if let Some(name) = name {
                subnet.name = name;
            }
            if let Some(gateway) = gateway {
                subnet.gateway = gateway;
            }
            Ok(())
        })
        .await
    }

    /// Remove a subnet together with its addresses and color groups.
    pub async fn delete(&self, id: &EntityId) -> Result<Subnet, CoreError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let current = self
            .subnets
            .get(id)
            .ok_or_else(|| CoreError::subnet_not_found(id))?;

        self.repo.remove(id).await.map_err(|e| {
            warn!(subnet = %id, error = %e, "repository rejected delete");
            CoreError::persistence("delete subnet", e)
        })?;

        self.subnets.remove(id);
        self.locks.remove(id);
        info!(subnet = %id, "subnet deleted");
        Ok(Subnet::clone(&current))
    }

    // ── Address allocation ───────────────────────────────────────────

    /// Merge `update` into one address and adjust the used count by the
    /// change in that address's status alone.
    pub async fn set_address(
        &self,
        id: &EntityId,
        address: Ipv4Addr,
        update: AddressUpdate,
    ) -> Result<Subnet, CoreError> {
        let now = Utc::now();
        self.mutate(id, "save address", |subnet| {
            let slot = subnet
                .addresses
                .iter_mut()
                .find(|a| a.address == address)
                .ok_or_else(|| CoreError::address_not_found(address))?;
            if let Some(kind) = slot.reserved_kind() {
                return Err(CoreError::ReservedAddress {
                    address: address.to_string(),
                    label: kind.label().into(),
                });
            }

            let next = slot.merged(&update, now);
            let (was_used, is_used) = (slot.is_used(), next.is_used());
            *slot = next;
            apply_delta(&mut subnet.used_ips, was_used, is_used);
            Ok(())
        })
        .await
    }

    /// Reset an address to a bare free record.
    pub async fn release_address(
        &self,
        id: &EntityId,
        address: Ipv4Addr,
    ) -> Result<Subnet, CoreError> {
        let now = Utc::now();
        self.mutate(id, "release address", |subnet| {
            let slot = subnet
                .addresses
                .iter_mut()
                .find(|a| a.address == address)
                .ok_or_else(|| CoreError::address_not_found(address))?;
            if let Some(kind) = slot.reserved_kind() {
                return Err(CoreError::ReservedAddress {
                    address: address.to_string(),
                    label: kind.label().into(),
                });
            }

            let was_used = slot.is_used();
            *slot = slot.released(now);
            apply_delta(&mut subnet.used_ips, was_used, false);
            Ok(())
        })
        .await
    }

    // ── DHCP range ───────────────────────────────────────────────────

    /// Set or clear (`None`) the DHCP pool.
    pub async fn set_dhcp_range(
        &self,
        id: &EntityId,
        range: Option<DhcpRangeRequest>,
    ) -> Result<Subnet, CoreError> {
        let range = range
            .map(|r| DhcpRange::parse(&r.start, &r.end))
            .transpose()?;
        let enforce = self.options.enforce_dhcp_bounds;

        self.mutate(id, "save DHCP range", |subnet| {
            if let Some(range) = range.as_ref().filter(|_| enforce) {
                range.check_within(&subnet.block()?)?;
            }
            subnet.dhcp_range = range;
            Ok(())
        })
        .await
    }

    // ── Color groups ─────────────────────────────────────────────────

    /// Replace the full color-group set.
    ///
    /// Addresses that pointed at a removed group keep the stale id, which
    /// simply resolves to no group.
    pub async fn set_color_groups(
        &self,
        id: &EntityId,
        groups: Vec<ColorGroupInput>,
    ) -> Result<Subnet, CoreError> {
        let groups = validate_groups(groups)?;
        self.mutate(id, "save color groups", |subnet| {
            subnet.color_groups = groups;
            Ok(())
        })
        .await
    }

    // ── Command execution ────────────────────────────────────────────

    /// Run a [`Command`] and describe the outcome.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::CreateSubnet(request) => {
                let subnet = self.create(request).await?;
                let summary = format!(
                    "Subnet {} ({}) was created successfully",
                    subnet.name, subnet.cidr
                );
                Ok(CommandResult::with_subnet(subnet, summary))
            }
            Command::UpdateSubnet { id, update } => {
                let subnet = self.update(&id, update).await?;
                let summary = format!("Subnet {} was updated successfully", subnet.name);
                Ok(CommandResult::with_subnet(subnet, summary))
            }
            Command::DeleteSubnet { id } => {
                let removed = self.delete(&id).await?;
                Ok(CommandResult {
                    subnet: None,
                    summary: format!("Subnet {} was deleted successfully", removed.name),
                })
            }
            Command::SetAddress {
                subnet_id,
                address,
                update,
            } => {
                let subnet = self.set_address(&subnet_id, address, update).await?;
                let summary = format!("IP {address} was updated successfully");
                Ok(CommandResult::with_subnet(subnet, summary))
            }
            Command::ReleaseAddress { subnet_id, address } => {
                let subnet = self.release_address(&subnet_id, address).await?;
                let summary = format!("IP {address} was released");
                Ok(CommandResult::with_subnet(subnet, summary))
            }
            Command::SetDhcpRange { subnet_id, range } => {
                let subnet = self.set_dhcp_range(&subnet_id, range).await?;
                let summary = match subnet.dhcp_range {
                    Some(range) => format!("DHCP range set to {range}"),
                    None => "DHCP range has been disabled".to_owned(),
                };
                Ok(CommandResult::with_subnet(subnet, summary))
            }
            Command::SetColorGroups { subnet_id, groups } => {
                let subnet = self.set_color_groups(&subnet_id, groups).await?;
                let summary = "Color groups have been updated successfully".to_owned();
                Ok(CommandResult::with_subnet(subnet, summary))
            }
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn lock_for(&self, id: &EntityId) -> Arc<Mutex<()>> {
        let entry = self.locks.entry(id.clone()).or_default();
        Arc::clone(entry.value())
    }

    async fn persist(&self, subnet: &Subnet, operation: &str) -> Result<(), CoreError> {
        self.repo.persist(subnet).await.map_err(|e| {
            warn!(subnet = %subnet.id, error = %e, "repository rejected {operation}");
            CoreError::persistence(operation, e)
        })
    }

    /// Apply `change` to a copy of the subnet under its lock, persist the
    /// copy, then publish it. Any error leaves the live record untouched.
    async fn mutate<F>(&self, id: &EntityId, operation: &str, change: F) -> Result<Subnet, CoreError>
    where
        F: FnOnce(&mut Subnet) -> Result<(), CoreError> + Send,
    {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let current = self
            .subnets
            .get(id)
            .ok_or_else(|| CoreError::subnet_not_found(id))?;
        let mut next = Subnet::clone(&current);
        change(&mut next)?;

        self.persist(&next, operation).await?;
        self.subnets.upsert(next.id.clone(), next.clone());
        debug!(subnet = %id, used = next.used_ips, "{operation} applied");
        Ok(next)
    }
}

fn parse_gateway(gateway: Option<&str>) -> Result<Option<Ipv4Addr>, CoreError> {
    match gateway.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Ok(Some(parse_addr(text)?)),
    }
}

fn apply_delta(used: &mut u64, was_used: bool, is_used: bool) {
    match (was_used, is_used) {
        (false, true) => *used += 1,
        (true, false) => *used = used.saturating_sub(1),
        _ => {}
    }
}

/// Trimmed subnet name; blank names are rejected.
fn subnet_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidSubnetName);
    }
    Ok(name.to_owned())
}

fn validate_groups(groups: Vec<ColorGroupInput>) -> Result<Vec<ColorGroup>, CoreError> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .map(|input| {
            let name = input.name.trim().to_owned();
            if name.is_empty() {
                return Err(CoreError::InvalidGroupName);
            }
            if !seen.insert(name.clone()) {
                return Err(CoreError::DuplicateGroupName { name });
            }
            Ok(ColorGroup {
                id: input.id.unwrap_or_else(EntityId::generate),
                name,
                color: input.color,
            })
        })
        .collect()
}
