use actix::prelude::*;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{IllegalMoveError, ProtocolError, Rejection};
use crate::models::{
    Color, Connect, ConnectionId, ConnectionRole, Disconnect, GameState, GameStatus, Inbound,
    ListSessions, MoveRequest, Outbound, Position, Session, SessionId, SessionStatus,
    SessionSummary,
};
use crate::protocol::{self, TerminationTag, WireMessage};
use crate::services::{CompletedGame, EventSink, GameStore, IdentityProvider, LogSink, SessionEvent};

/// Owns every session and game. All connection events funnel through this
/// actor's mailbox, so each `GameState` is mutated by one message at a time.
pub struct SessionManager {
    connections: HashMap<ConnectionId, Recipient<Outbound>>,
    assignments: HashMap<ConnectionId, SessionId>,
    sessions: HashMap<SessionId, Session>,
    /// Session ids in creation order
    order: Vec<SessionId>,
    store: Arc<dyn GameStore>,
    identities: Arc<dyn IdentityProvider>,
    events: Box<dyn EventSink>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn GameStore>, identities: Arc<dyn IdentityProvider>) -> Self {
        SessionManager {
            connections: HashMap::new(),
            assignments: HashMap::new(),
            sessions: HashMap::new(),
            order: Vec::new(),
            store,
            identities,
            events: Box::new(LogSink),
        }
    }

    pub fn with_events(mut self, events: Box<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    fn send_line(&self, id: ConnectionId, line: &str) {
        if let Some(connection) = self.connections.get(&id) {
            connection.do_send(Outbound::Line(line.to_string()));
        }
    }

    fn send(&self, id: ConnectionId, message: &WireMessage) {
        self.send_line(id, &protocol::encode(message));
    }

    fn oldest(&self, status: SessionStatus) -> Option<SessionId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.sessions.get(id).map(|s| s.status) == Some(status))
    }

    fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        self.order.retain(|s| *s != id);
        self.sessions.remove(&id)
    }

    /// Waiting seat first, then spectating a running game, else a new session
    fn assign_role(&mut self, id: ConnectionId, peer: String) -> (SessionId, ConnectionRole) {
        if let Some(sid) = self.oldest(SessionStatus::WaitingForPlayers) {
            if let Some(session) = self.sessions.get_mut(&sid) {
                if let Some(color) = session.take_seat(id, peer.clone()) {
                    return (sid, ConnectionRole::player(color));
                }
            }
        }

        if let Some(sid) = self.oldest(SessionStatus::InProgress) {
            if let Some(session) = self.sessions.get_mut(&sid) {
                session.spectators.insert(id);
                return (sid, ConnectionRole::Spectator);
            }
        }

        let mut session = Session::new();
        let sid = session.id;
        let role = session
            .take_seat(id, peer)
            .map(ConnectionRole::player)
            .unwrap_or(ConnectionRole::Spectator);
        info!("Opened session {}", sid);
        self.sessions.insert(sid, session);
        self.order.push(sid);
        (sid, role)
    }

    /// Both seats are filled: resolve player ids and create the game
    fn start_game(&mut self, sid: SessionId) {
        let identities = Arc::clone(&self.identities);
        let Some(session) = self.sessions.get_mut(&sid) else {
            return;
        };

        for seat in session.white.iter_mut().chain(session.black.iter_mut()) {
            let player_id = match identities.resolve_or_create_player_id(&seat.display_name) {
                Ok(player_id) => player_id,
                Err(e) => {
                    error!(
                        "Could not resolve player id for {}: {}, using the display name",
                        seat.display_name, e
                    );
                    seat.display_name.clone()
                }
            };
            seat.player_id = Some(player_id);
        }

        session.game = Some(GameState::new());
        session.status = SessionStatus::InProgress;
        info!("Session {} paired up, game started", sid);
    }

    fn dispatch(&mut self, id: ConnectionId, sid: SessionId, line: &str) -> Result<(), Rejection> {
        let message = protocol::decode(line)?;
        let role = self
            .sessions
            .get(&sid)
            .and_then(|session| session.role_of(id))
            .ok_or(ProtocolError::NotStarted)?;

        match message {
            WireMessage::Move(request) => self.handle_move(id, sid, role, request),
            WireMessage::MovesQuery(from) => self.handle_moves_query(id, sid, from),
            WireMessage::Termination {
                tag: TerminationTag::Resignation,
                ..
            } => {
                let color = role
                    .color()
                    .ok_or_else(|| ProtocolError::SpectatorCommand("RESIGNATION".to_string()))?;
                self.game_mut(sid)?.resign(color);
                info!("{} resigned in session {}", color, sid);
                self.complete(sid);
                Ok(())
            }
            WireMessage::Termination {
                tag: TerminationTag::Draw,
                ..
            } => {
                let color = role
                    .color()
                    .ok_or_else(|| ProtocolError::SpectatorCommand("DRAW".to_string()))?;
                self.game_mut(sid)?.declare_draw();
                info!("{} declared a draw in session {}", color, sid);
                self.complete(sid);
                Ok(())
            }
            WireMessage::Termination { tag, .. } => {
                Err(ProtocolError::ServerOnly(tag.keyword().to_string()).into())
            }
            WireMessage::Role(_) => Err(ProtocolError::ServerOnly("role announcement".to_string()).into()),
            WireMessage::MovesReply { .. } => Err(ProtocolError::ServerOnly("MOVES reply".to_string()).into()),
            WireMessage::Error(_) => Err(ProtocolError::ServerOnly("ERROR".to_string()).into()),
        }
    }

    fn game_mut(&mut self, sid: SessionId) -> Result<&mut GameState, ProtocolError> {
        self.sessions
            .get_mut(&sid)
            .and_then(|session| session.game.as_mut())
            .ok_or(ProtocolError::NotStarted)
    }

    fn handle_move(
        &mut self,
        id: ConnectionId,
        sid: SessionId,
        role: ConnectionRole,
        request: MoveRequest,
    ) -> Result<(), Rejection> {
        let color = role.color().ok_or(ProtocolError::SpectatorMove)?;

        let (line, recipients, snapshot, mv, over) = {
            let session = self.sessions.get_mut(&sid).ok_or(ProtocolError::NotStarted)?;
            let game = session.game.as_mut().ok_or(ProtocolError::NotStarted)?;
            if game.side_to_move() != color {
                return Err(IllegalMoveError::NotYourTurn(game.side_to_move()).into());
            }
            if request.piece.color != color {
                return Err(ProtocolError::NotYourPieces(request.piece.color).into());
            }

            let mv = game.apply_move(request)?;
            let snapshot = game.fen();
            let over = game.is_over();
            let line = protocol::encode(&WireMessage::Move(mv.request()));
            session.history.push(line.clone());
            let recipients: Vec<ConnectionId> =
                session.members().into_iter().filter(|member| *member != id).collect();
            (line, recipients, snapshot, mv, over)
        };

        info!("Session {}: {} played {}", sid, color, line);
        for recipient in recipients {
            self.send_line(recipient, &line);
        }
        self.events.emit(SessionEvent::MoveApplied {
            session_id: sid,
            mv,
            board: snapshot,
        });

        if over {
            self.complete(sid);
        }
        Ok(())
    }

    fn handle_moves_query(
        &mut self,
        id: ConnectionId,
        sid: SessionId,
        from: Position,
    ) -> Result<(), Rejection> {
        let game = self.game_mut(sid)?;
        let destinations = game.legal_moves(from).into_iter().collect();
        self.send(id, &WireMessage::MovesReply { from, destinations });
        Ok(())
    }

    /// Announce the result, archive the game and release every role
    fn complete(&mut self, sid: SessionId) {
        let Some(mut session) = self.remove_session(sid) else {
            return;
        };
        session.status = SessionStatus::Completed;
        let members = session.members();

        if let Some(game) = session.game.as_ref() {
            let result = game.result_text().unwrap_or("unfinished").to_string();
            if let Some(tag) = termination_for(game) {
                let line = protocol::encode(&tag);
                for member in &members {
                    self.send_line(*member, &line);
                }
            }
            info!("Session {} completed: {}", sid, result);
            self.events.emit(SessionEvent::GameEnded {
                session_id: sid,
                result: result.clone(),
            });

            let record = CompletedGame {
                session_id: sid,
                moves: session.history.clone(),
                white_player: player_name(&session, Color::White),
                black_player: player_name(&session, Color::Black),
                result,
            };
            if let Err(e) = self.store.save_completed_game(&record) {
                error!("Failed to persist game {}: {}", sid, e);
            }
        }

        for member in members {
            self.assignments.remove(&member);
            if let Some(connection) = self.connections.get(&member) {
                connection.do_send(Outbound::Close);
            }
        }
    }
}

fn termination_for(game: &GameState) -> Option<WireMessage> {
    let tag = match game.status() {
        GameStatus::InProgress => return None,
        GameStatus::Checkmate => TerminationTag::Checkmate,
        GameStatus::Stalemate => TerminationTag::Stalemate,
        GameStatus::Resigned => TerminationTag::Resignation,
        GameStatus::Drawn => TerminationTag::Draw,
    };
    Some(WireMessage::Termination {
        tag,
        winner: game.winner(),
    })
}

fn player_name(session: &Session, color: Color) -> String {
    session
        .seat(color)
        .map(|seat| seat.player_id.clone().unwrap_or_else(|| seat.display_name.clone()))
        .unwrap_or_default()
}

impl Actor for SessionManager {
    type Context = Context<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        info!("Session manager started");
    }
}

impl Handler<Connect> for SessionManager {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Self::Context) {
        let Connect { id, peer, outbound } = msg;
        self.connections.insert(id, outbound);

        let (sid, role) = self.assign_role(id, peer.clone());
        self.assignments.insert(id, sid);
        info!("Connection {} ({}) joined session {} as {:?}", id, peer, sid, role);

        self.send(id, &WireMessage::Role(role));
        if let Some(session) = self.sessions.get(&sid) {
            for line in &session.history {
                self.send_line(id, line);
            }
        }
        self.events.emit(SessionEvent::RoleAssigned {
            session_id: sid,
            connection: id,
            role,
        });

        let ready = self
            .sessions
            .get(&sid)
            .map(|s| s.status == SessionStatus::WaitingForPlayers && s.is_full())
            .unwrap_or(false);
        if ready {
            self.start_game(sid);
        }
        info!("Total active connections: {}", self.connections.len());
    }
}

impl Handler<Inbound> for SessionManager {
    type Result = ();

    fn handle(&mut self, msg: Inbound, _: &mut Self::Context) {
        let Some(&sid) = self.assignments.get(&msg.id) else {
            warn!("Dropping line from unassigned connection {}", msg.id);
            return;
        };
        let line = match std::str::from_utf8(&msg.line) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Undecodable line from {}: {}", msg.id, e);
                let rejection = ProtocolError::Malformed("invalid UTF-8".to_string());
                self.send(msg.id, &WireMessage::Error(rejection.to_string()));
                return;
            }
        };
        if line.is_empty() {
            return;
        }
        debug!("Received from {}: {}", msg.id, line);

        if let Err(rejection) = self.dispatch(msg.id, sid, line) {
            warn!("Rejected {:?} from {}: {}", line, msg.id, rejection);
            self.send(msg.id, &WireMessage::Error(rejection.to_string()));
        }
    }
}

impl Handler<Disconnect> for SessionManager {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Self::Context) {
        self.connections.remove(&msg.id);
        let Some(sid) = self.assignments.remove(&msg.id) else {
            info!("Connection {} closed", msg.id);
            return;
        };
        let Some(session) = self.sessions.get_mut(&sid) else {
            return;
        };

        let seat = session.role_of(msg.id).and_then(ConnectionRole::color);
        match (session.status, seat) {
            (SessionStatus::InProgress, Some(color)) => {
                info!("{} left session {} mid-game, forfeiting", color, sid);
                if let Some(game) = session.game.as_mut() {
                    game.forfeit(color);
                }
                self.complete(sid);
            }
            _ => {
                session.vacate(msg.id);
                let abandoned =
                    session.status == SessionStatus::WaitingForPlayers && session.is_empty();
                if abandoned {
                    self.remove_session(sid);
                    info!("Discarded empty session {}", sid);
                }
            }
        }
        info!("Connection {} closed, {} still active", msg.id, self.connections.len());
    }
}

impl Handler<ListSessions> for SessionManager {
    type Result = MessageResult<ListSessions>;

    fn handle(&mut self, _: ListSessions, _: &mut Self::Context) -> Self::Result {
        let summaries: Vec<SessionSummary> = self
            .order
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .map(Session::summary)
            .collect();
        MessageResult(summaries)
    }
}
