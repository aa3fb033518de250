//! RAM-only bond store handed to the SoftDevice as the security handler.
//!
//! Bonds do not survive a reset. Each bond also keeps the host's GATT
//! system attributes (the CCCD values), which the SoftDevice asks for again
//! when the host reconnects. A failed pairing clears every stored bond so
//! the host can start over.

use core::cell::RefCell;

use defmt::{debug, info, warn};
use heapless::Vec;
use keymouse::config::{MAX_BONDED_HOSTS, SYS_ATTRS_CAPACITY};
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{
    gatt_server, Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode,
};
use static_cell::StaticCell;

struct HostBond {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
    sys_attrs: Vec<u8, SYS_ATTRS_CAPACITY>,
}

pub struct Bonder {
    hosts: RefCell<Vec<HostBond, MAX_BONDED_HOSTS>>,
}

impl Bonder {
    fn new() -> Self {
        Self {
            hosts: RefCell::new(Vec::new()),
        }
    }

    /// Forget every bonded host.
    pub fn clear(&self) {
        let mut hosts = self.hosts.borrow_mut();
        info!("deleting {} bond(s)", hosts.len());
        hosts.clear();
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        let mut hosts = self.hosts.borrow_mut();
        if let Some(existing) = hosts.iter_mut().find(|h| h.master_id == master_id) {
            existing.key = key;
            existing.peer_id = peer_id;
            existing.sys_attrs.clear();
            return;
        }

        if hosts.is_full() {
            hosts.remove(0);
        }

        let _ = hosts.push(HostBond {
            master_id,
            key,
            peer_id,
            sys_attrs: Vec::new(),
        });
        info!("host bonded ({} stored)", hosts.len());
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.hosts
            .borrow()
            .iter()
            .find_map(|h| (h.master_id == master_id).then_some(h.key))
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        info!("link security mode: {}", mode);
    }

    fn save_sys_attrs(&self, conn: &Connection) {
        let mut hosts = self.hosts.borrow_mut();
        let Some(host) = hosts
            .iter_mut()
            .find(|h| h.peer_id.is_match(conn.peer_address()))
        else {
            return;
        };

        let mut buf = [0u8; SYS_ATTRS_CAPACITY];
        match gatt_server::get_sys_attrs(conn, &mut buf) {
            Ok(len) => match Vec::from_slice(&buf[..len]) {
                Ok(attrs) => {
                    debug!("saved {} bytes of system attributes", len);
                    host.sys_attrs = attrs;
                }
                Err(()) => warn!("system attributes too large ({} bytes)", len),
            },
            Err(e) => warn!("get_sys_attrs: {:?}", e),
        }
    }

    fn load_sys_attrs(&self, conn: &Connection) {
        let hosts = self.hosts.borrow();
        let attrs = hosts
            .iter()
            .find(|h| h.peer_id.is_match(conn.peer_address()))
            .map(|h| h.sys_attrs.as_slice())
            .filter(|a| !a.is_empty());

        if let Err(e) = gatt_server::set_sys_attrs(conn, attrs) {
            warn!("set_sys_attrs: {:?}", e);
        }
    }
}

/// The single bond store. Panics if called twice.
pub fn bonder() -> &'static Bonder {
    static BONDER: StaticCell<Bonder> = StaticCell::new();
    BONDER.init(Bonder::new())
}
