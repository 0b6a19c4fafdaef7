/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes one top-level command module:

- `auth` — Provider authentication and credential status

These handlers are intentionally small and use the library components:
the auth service, the device-flow client, and the credential store.
*/

pub mod auth;
