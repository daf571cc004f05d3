#[cfg(test)]
mod common;

#[cfg(test)]
mod test_ev_caps;


#[cfg(test)]
mod test_session_flow;
