pub mod psi_server;
