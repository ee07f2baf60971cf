use crate::protocol::{Message, Reply};
use crate::state::{Identity, ServerState};

/// The ordered burst a client receives the moment it is registered:
/// 001-003, the user statistics, then the message of the day.
pub fn welcome_burst(server_state: &ServerState, identity: &Identity) -> Vec<Message> {
    let info = &server_state.info;
    let registry = &server_state.registry;
    let nick = identity.nick.clone();

    let users = registry.client_count();
    let max = registry.max_clients();

    let mut replies = vec![
        Reply::Welcome {
            nick: nick.clone(),
            network: info.network.clone(),
            mask: identity.mask(),
        },
        Reply::YourHost {
            nick: nick.clone(),
            servername: info.name.clone(),
            version: info.version.clone(),
        },
        Reply::Created {
            nick: nick.clone(),
            date: info.created_at.format("%a %b %e %Y at %H:%M:%S UTC").to_string(),
        },
        Reply::LuserClient {
            nick: nick.clone(),
            users,
        },
        // Sessions still in the handshake are not tracked centrally.
        Reply::LuserUnknown {
            nick: nick.clone(),
            unknown: 0,
        },
        Reply::LuserChannels {
            nick: nick.clone(),
            channels: registry.channel_count(),
        },
        Reply::LuserMe {
            nick: nick.clone(),
            clients: users,
        },
        Reply::LocalUsers {
            nick: nick.clone(),
            current: users,
            max,
        },
        Reply::GlobalUsers {
            nick: nick.clone(),
            current: users,
            max,
        },
        Reply::MotdStart {
            nick: nick.clone(),
            server: info.name.clone(),
        },
    ];

    replies.extend(info.motd.iter().map(|line| Reply::Motd {
        nick: nick.clone(),
        line: line.clone(),
    }));
    replies.push(Reply::EndOfMotd { nick });

    replies
        .iter()
        .map(|reply| reply.to_message(&info.name))
        .collect()
}
