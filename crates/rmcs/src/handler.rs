//! Per-connection handler: decode requests, run them, send replies.
//!
//! Each connection gets its own task running [`handle_connection`]. The
//! protocol is strictly request/response: every frame the client sends
//! gets exactly one reply carrying the same `seq`.

use std::sync::Arc;

use rmcs_protocol::{Codec, Envelope, Request, Response};
use rmcs_room::{Dealer, GameError, GameRoomEngine, JoinReceipt, RoomStore};

use crate::server::ServerState;
use crate::transport::Connection;
use crate::ServerError;

/// Serves one connection until it closes, errors, or goes idle.
pub(crate) async fn handle_connection<S, D, C>(
    mut conn: Connection,
    state: Arc<ServerState<S, D, C>>,
) -> Result<(), ServerError>
where
    S: RoomStore,
    D: Dealer,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, peer = %conn.peer(), "handling new connection");

    loop {
        let data = match tokio::time::timeout(state.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, "connection idle, closing");
                break;
            }
        };

        let envelope: Envelope<Request> = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode request");
                let reply = Response::Error {
                    code: 400,
                    message: e.to_string(),
                };
                send_reply(&mut conn, &state, 0, reply).await?;
                continue;
            }
        };

        let reply = dispatch(&state.engine, state.uptime_ms(), envelope.payload);
        send_reply(&mut conn, &state, envelope.seq, reply).await?;
    }

    conn.close().await;
    Ok(())
}

/// Runs one request against the engine and builds the reply.
///
/// Never fails: rule violations become `Response::Error`.
pub(crate) fn dispatch<S, D>(engine: &GameRoomEngine<S, D>, now_ms: u64, request: Request) -> Response
where
    S: RoomStore,
    D: Dealer,
{
    let result = match request {
        Request::CreateRoom { player_name } => engine.create_room(&player_name).map(joined),
        Request::JoinRoom {
            room_id,
            player_name,
        } => engine.join_room(&room_id, &player_name).map(joined),
        Request::AssignRoles { room_id } => engine
            .assign_roles(&room_id)
            .map(|()| Response::RolesAssigned { room_id }),
        Request::MyRole { room_id, player_id } => engine
            .my_role(&room_id, &player_id)
            .map(|role| Response::MyRole { role }),
        Request::SubmitGuess {
            room_id,
            mantri_id,
            guess_id,
        } => engine
            .submit_guess(&room_id, &mantri_id, &guess_id)
            .map(|outcome| Response::GuessResult {
                correct: outcome.correct,
                guessed_id: outcome.guessed_id,
            }),
        Request::RoomSummary { room_id } => engine
            .room_summary(&room_id)
            .map(|summary| Response::RoomSummary { summary }),
        Request::NextRound { room_id } => engine
            .next_round(&room_id)
            .map(|round| Response::RoundStarted { room_id, round }),
        Request::Heartbeat { client_time } => Ok(Response::HeartbeatAck {
            client_time,
            server_time: now_ms,
        }),
    };

    result.unwrap_or_else(|e| error_response(&e))
}

fn joined(receipt: JoinReceipt) -> Response {
    Response::RoomJoined {
        room_id: receipt.room_id,
        player_id: receipt.player_id,
        players: receipt.players,
    }
}

/// Maps an engine error to a reply. Internal faults are logged loudly and
/// their details stay on the server.
fn error_response(err: &GameError) -> Response {
    if err.is_internal() {
        tracing::error!(error = %err, "engine invariant violated");
        return Response::Error {
            code: err.status_code(),
            message: "internal error".into(),
        };
    }
    tracing::debug!(error = %err, "request refused");
    Response::Error {
        code: err.status_code(),
        message: err.to_string(),
    }
}

async fn send_reply<S, D, C: Codec>(
    conn: &mut Connection,
    state: &ServerState<S, D, C>,
    seq: u64,
    reply: Response,
) -> Result<(), ServerError> {
    let envelope = Envelope::new(seq, state.uptime_ms(), reply);
    let bytes = state.codec.encode(&envelope)?;
    let text = String::from_utf8(bytes).map_err(|_| {
        rmcs_protocol::ProtocolError::InvalidMessage("codec produced non-UTF-8 output".into())
    })?;
    conn.send_text(text).await
}
