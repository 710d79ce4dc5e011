//! # Core Module
//!
//! This module provides the stateless building blocks of pathway perturbation scoring.
//!
//! ## Overview
//!
//! A pathway is a square signed interaction matrix over its member genes. For one
//! sample, the pathway's aligned fold-change vector `fc` drives the linear system
//! `X · pf = -fc`, whose solution `pf` is the equilibrium perturbation propagated
//! through the network. Summing `pf - fc` over the pathway's genes yields the net
//! accumulated perturbation for that sample.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Labeled fold-change matrices, pathway matrices and
//!   collections, and score tables
//! - **Gene Alignment** ([`alignment`]) - Name-based mapping from pathway genes to
//!   expression rows
//! - **Linear Solvers** ([`solver`]) - Interchangeable factorization strategies and the
//!   perturbation computation
//! - **File I/O** ([`io`]) - Tab-separated readers and writers for host programs

pub mod alignment;
pub mod io;
pub mod models;
pub mod solver;
