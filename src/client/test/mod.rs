
mod state_ready;





mod state_timeout;
