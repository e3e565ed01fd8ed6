pub(crate) mod register;
pub(crate) use register::*;

pub(crate) mod login;
pub(crate) use login::*;

pub(crate) mod reset;
pub(crate) use reset::*;

pub(crate) mod users;
pub(crate) use users::*;

pub(crate) mod agg;
pub(crate) use agg::*;

pub(crate) mod addfeed;
pub(crate) use addfeed::*;

pub(crate) mod feeds;
pub(crate) use feeds::*;

pub(crate) mod follow;
pub(crate) use follow::*;

pub(crate) mod following;
pub(crate) use following::*;

pub(crate) mod unfollow;
pub(crate) use unfollow::*;
