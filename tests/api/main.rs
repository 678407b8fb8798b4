mod game;
mod health;
mod helpers;
mod room;
