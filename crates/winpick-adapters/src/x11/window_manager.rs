use std::collections::HashSet;

use tracing::{debug, trace, warn};
use winpick_core::{Placement, WindowEntry, WindowId, WindowManager, WindowManagerError};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ClientMessageEvent, ConnectionExt, EventMask, Window,
};
use x11rb::rust_connection::RustConnection;

use super::properties::{focus_ranks, is_switchable, parse_wm_class, placement_desktop};

const SOURCE_INDICATION_PAGER: u32 = 2;
const PROPERTY_LENGTH: u32 = 2048;

struct Atoms {
    net_client_list: Atom,
    net_client_list_stacking: Atom,
    net_active_window: Atom,
    net_close_window: Atom,
    net_current_desktop: Atom,
    net_wm_desktop: Atom,
    net_wm_name: Atom,
    net_wm_window_type: Atom,
    utf8_string: Atom,
    switchable_types: Vec<Atom>,
}

/// EWMH window manager client.
pub struct X11WindowManager {
    connection: RustConnection,
    root_window: Window,
    atoms: Atoms,
}

impl X11WindowManager {
    pub fn new() -> Result<Self, WindowManagerError> {
        let (connection, screen_number) =
            RustConnection::connect(None).map_err(|error| WindowManagerError::Unavailable {
                message: error.to_string(),
            })?;

        let root_window = connection
            .setup()
            .roots
            .get(screen_number)
            .map(|screen| screen.root)
            .ok_or_else(|| WindowManagerError::Unavailable {
                message: format!("screen {} not found", screen_number),
            })?;

        let atoms = Atoms {
            net_client_list: intern(&connection, "_NET_CLIENT_LIST")?,
            net_client_list_stacking: intern(&connection, "_NET_CLIENT_LIST_STACKING")?,
            net_active_window: intern(&connection, "_NET_ACTIVE_WINDOW")?,
            net_close_window: intern(&connection, "_NET_CLOSE_WINDOW")?,
            net_current_desktop: intern(&connection, "_NET_CURRENT_DESKTOP")?,
            net_wm_desktop: intern(&connection, "_NET_WM_DESKTOP")?,
            net_wm_name: intern(&connection, "_NET_WM_NAME")?,
            net_wm_window_type: intern(&connection, "_NET_WM_WINDOW_TYPE")?,
            utf8_string: intern(&connection, "UTF8_STRING")?,
            switchable_types: vec![
                intern(&connection, "_NET_WM_WINDOW_TYPE_NORMAL")?,
                intern(&connection, "_NET_WM_WINDOW_TYPE_DIALOG")?,
                intern(&connection, "_NET_WM_WINDOW_TYPE_UTILITY")?,
            ],
        };

        debug!("X11 window manager client initialized");

        Ok(Self {
            connection,
            root_window,
            atoms,
        })
    }

    fn get_window_list(&self, property: Atom) -> Result<Vec<Window>, WindowManagerError> {
        let reply = self
            .connection
            .get_property(false, self.root_window, property, AtomEnum::WINDOW, 0, u32::MAX)
            .map_err(request_error)?
            .reply()
            .map_err(request_error)?;

        Ok(reply
            .value32()
            .map(|values| values.collect())
            .unwrap_or_default())
    }

    fn get_cardinal(&self, window: Window, property: Atom) -> Option<u32> {
        let reply = self
            .connection
            .get_property(false, window, property, AtomEnum::CARDINAL, 0, 1)
            .ok()?
            .reply()
            .ok()?;

        let value = reply.value32()?.next();
        value
    }

    fn get_active_window(&self) -> Option<Window> {
        let reply = self
            .connection
            .get_property(
                false,
                self.root_window,
                self.atoms.net_active_window,
                AtomEnum::WINDOW,
                0,
                1,
            )
            .ok()?
            .reply()
            .ok()?;

        let value = reply.value32()?.next().filter(|window| *window != 0);
        value
    }

    fn get_window_class(&self, window: Window) -> Option<String> {
        let reply = self
            .connection
            .get_property(
                false,
                window,
                AtomEnum::WM_CLASS,
                AtomEnum::STRING,
                0,
                PROPERTY_LENGTH,
            )
            .ok()?
            .reply()
            .ok()?;

        parse_wm_class(&reply.value)
    }

    fn get_window_title(&self, window: Window) -> Option<String> {
        if let Some(title) = self.get_net_wm_name(window) {
            return Some(title);
        }

        self.get_wm_name(window)
    }

    fn get_net_wm_name(&self, window: Window) -> Option<String> {
        let reply = self
            .connection
            .get_property(
                false,
                window,
                self.atoms.net_wm_name,
                self.atoms.utf8_string,
                0,
                PROPERTY_LENGTH,
            )
            .ok()?
            .reply()
            .ok()?;

        if reply.value.is_empty() {
            return None;
        }

        String::from_utf8(reply.value).ok()
    }

    fn get_wm_name(&self, window: Window) -> Option<String> {
        let reply = self
            .connection
            .get_property(
                false,
                window,
                AtomEnum::WM_NAME,
                AtomEnum::STRING,
                0,
                PROPERTY_LENGTH,
            )
            .ok()?
            .reply()
            .ok()?;

        if reply.value.is_empty() {
            return None;
        }

        Some(
            String::from_utf8_lossy(&reply.value)
                .trim_end_matches('\0')
                .to_string(),
        )
    }

    fn get_window_types(&self, window: Window) -> Vec<Atom> {
        self.connection
            .get_property(
                false,
                window,
                self.atoms.net_wm_window_type,
                AtomEnum::ATOM,
                0,
                32,
            )
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .and_then(|reply| reply.value32().map(|values| values.collect()))
            .unwrap_or_default()
    }

    fn send_client_message(
        &self,
        window: Window,
        message_type: Atom,
        data: [u32; 5],
    ) -> Result<(), WindowManagerError> {
        let event = ClientMessageEvent::new(32, window, message_type, data);

        self.connection
            .send_event(
                false,
                self.root_window,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )
            .map_err(request_error)?;

        Ok(())
    }

    fn move_to_desktop(&self, window: Window, desktop: u32) -> Result<(), WindowManagerError> {
        trace!(window, desktop, "moving window to desktop");
        self.send_client_message(
            window,
            self.atoms.net_wm_desktop,
            [desktop, SOURCE_INDICATION_PAGER, 0, 0, 0],
        )
    }

    fn client_set(&self) -> Result<HashSet<Window>, WindowManagerError> {
        Ok(self
            .get_window_list(self.atoms.net_client_list)?
            .into_iter()
            .collect())
    }
}

impl WindowManager for X11WindowManager {
    fn enumerate(&self) -> Result<Vec<WindowEntry>, WindowManagerError> {
        let clients = self.get_window_list(self.atoms.net_client_list)?;
        let stacking = self.get_window_list(self.atoms.net_client_list_stacking)?;
        let ranks = focus_ranks(&stacking);
        let unranked = stacking.len() as u32;
        let active_window = self.get_active_window();

        let mut entries = Vec::with_capacity(clients.len());

        for window in clients {
            if !is_switchable(&self.get_window_types(window), &self.atoms.switchable_types) {
                trace!(window, "skipping non switchable window");
                continue;
            }

            let class_name = self.get_window_class(window);
            let title = self.get_window_title(window);

            if class_name.is_none() && title.is_none() {
                trace!(window, "window vanished during enumeration");
                continue;
            }

            entries.push(WindowEntry {
                id: WindowId(window),
                title: title.unwrap_or_default(),
                class_name: class_name.unwrap_or_default(),
                is_current: active_window == Some(window),
                last_focus_rank: ranks.get(&window).copied().unwrap_or(unranked),
            });
        }

        debug!(windows = entries.len(), active_window = ?active_window, "enumerated windows");
        Ok(entries)
    }

    fn focus(&self, id: WindowId, placement: Placement) -> Result<(), WindowManagerError> {
        let window = id.0;

        if !self.client_set()?.contains(&window) {
            return Err(WindowManagerError::WindowGone { id });
        }

        if placement == Placement::OtherWindow {
            let current_desktop = self.get_cardinal(self.root_window, self.atoms.net_current_desktop);
            match placement_desktop(placement, current_desktop) {
                Some(desktop) => self.move_to_desktop(window, desktop)?,
                None => warn!("window manager does not report the current desktop"),
            }
        }

        self.send_client_message(
            window,
            self.atoms.net_active_window,
            [SOURCE_INDICATION_PAGER, x11rb::CURRENT_TIME, 0, 0, 0],
        )?;
        self.connection.flush().map_err(request_error)?;

        debug!(window = %id, ?placement, "activation requested");
        Ok(())
    }

    fn close(&self, ids: &[WindowId]) -> Result<usize, WindowManagerError> {
        let clients = self.client_set()?;
        let mut closed = 0;

        for id in ids {
            if !clients.contains(&id.0) {
                debug!(window = %id, "window already gone, not closing");
                continue;
            }

            self.send_client_message(
                id.0,
                self.atoms.net_close_window,
                [x11rb::CURRENT_TIME, SOURCE_INDICATION_PAGER, 0, 0, 0],
            )?;
            closed += 1;
        }

        self.connection.flush().map_err(request_error)?;

        debug!(requested = ids.len(), closed, "close requested");
        Ok(closed)
    }
}

fn intern(connection: &RustConnection, name: &str) -> Result<Atom, WindowManagerError> {
    Ok(connection
        .intern_atom(false, name.as_bytes())
        .map_err(request_error)?
        .reply()
        .map_err(request_error)?
        .atom)
}

fn request_error(error: impl std::fmt::Display) -> WindowManagerError {
    WindowManagerError::Request {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_can_be_created_or_fails_gracefully() {
        match X11WindowManager::new() {
            Ok(manager) => {
                let entries = manager.enumerate();
                assert!(entries.is_ok(), "enumeration failed: {:?}", entries.err());
            }
            Err(error) => {
                assert!(matches!(error, WindowManagerError::Unavailable { .. }));
                println!("X11 not available (expected in CI): {}", error);
            }
        }
    }
}
