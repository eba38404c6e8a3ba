use crate::models::Moment;

/// A catalog entry inserted into an empty database on first start.
pub(super) struct SeedSong {
    pub(super) title: &'static str,
    pub(super) description: &'static str,
    pub(super) lyrics: &'static str,
    pub(super) audio_url: &'static str,
    pub(super) moments: &'static [Moment],
}

pub(super) const DEFAULT_SONGS: &[SeedSong] = &[
    SeedSong {
        title: "Ave Maria",
        description: "A classic hymn honoring Mary, perfect for the entrance or beginning of the ceremony.",
        lyrics: "Ave Maria, gratia plena\nDominus tecum, benedicta tu\nAve Maria, gratia plena\nDominus tecum, benedicta tu in mulieribus\nEt benedictus fructus ventris tui, Jesus\n\nSancta Maria, Mater Dei\nOra pro nobis peccatoribus\nNunc et in hora mortis nostrae\nAmen.",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/d/d7/Bach_Gounod_Ave_Maria.ogg",
        moments: &[Moment::Ingresso, Moment::Inizio],
    },
    SeedSong {
        title: "Vieni Spirito d'Amore",
        description: "An invocational hymn calling upon the Holy Spirit, ideal for the beginning of the ceremony.",
        lyrics: "Vieni Spirito d'amore,\nManda a noi dal cielo\nUn raggio della tua luce.\n\nVieni padre dei poveri,\nVieni datore dei doni,\nVieni luce dei cuori.\n\nConsolatore perfetto,\nOspite dolce dell'anima,\nDolcissimo sollievo.",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/8/8b/Mendelssohn_-_Spring_Song.ogg",
        moments: &[Moment::Inizio],
    },
    SeedSong {
        title: "Invitato alla Festa",
        description: "A welcoming song inviting guests to participate in the celebration of love.",
        lyrics: "Invitato alla festa di nozze,\nSei venuto, Signore, tra noi,\nCome un giorno a Cana di Galilea.\n\nE ti doni ancora a chi ti cerca,\nCome vino che allieta ogni cuore,\nCome amore che unisce due vite.",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/f/f1/Grieg_-_Wedding_Day_at_Troldhaugen.ogg",
        moments: &[Moment::Inizio],
    },
    SeedSong {
        title: "Alleluia Pasquale",
        description: "A joyous Alleluia hymn traditionally sung before the Gospel reading.",
        lyrics: "Alleluia, alleluia, alleluia!\nAlleluia, alleluia, alleluia!\n\nResurrection day arrived\nCelebrate and raise your voices high\nLet the good news echo all around\nJesus Christ is risen from the tomb\n\nAlleluia, alleluia, alleluia!\nAlleluia, alleluia, alleluia!",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/5/55/Handel_-_Hallelujah_Chorus.ogg",
        moments: &[Moment::Alleluia],
    },
    SeedSong {
        title: "Servo per Amore",
        description: "A beautiful hymn about service through love, perfect for offertory or communion.",
        lyrics: "Una notte di sudore\nSulla barca in mezzo al mare\nE mentre il cielo s'imbianca già\nTu guardi le tue reti vuote\n\nMa la voce che ti chiama\nUn altro mare ti mostrerà\nE sulle rive di ogni cuore\nLe tue reti getterai\n\nOffri la vita tua come Maria\nAi piedi della croce\nE sarai servo di ogni uomo\nServo per amore\nSacerdote dell'umanità",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/0/05/Moonlight_Sonata_Movement_1.ogg",
        moments: &[Moment::Offertorio, Moment::Comunione],
    },
    SeedSong {
        title: "Santo Gen Verde",
        description: "A contemporary rendition of the \"Holy, Holy, Holy\" hymn for the Sanctus moment.",
        lyrics: "Santo, Santo, Santo\nIl Signore Dio dell'universo\nI cieli e la terra sono pieni della tua gloria\n\nOsanna, osanna nell'alto dei cieli\nOsanna, osanna nell'alto dei cieli\n\nBenedetto colui che viene nel nome del Signore\n\nOsanna, osanna nell'alto dei cieli\nOsanna, osanna nell'alto dei cieli",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/e/e2/Bach_-_Jesu%2C_Joy_of_Man%27s_Desiring.ogg",
        moments: &[Moment::Santo],
    },
    SeedSong {
        title: "Pace a Te",
        description: "A gentle hymn about peace and harmony, ideal for the sign of peace.",
        lyrics: "Pace a te, fratello mio\nPace a te, sorella mia\nPace a tutti gli uomini\nDi buona volontà\n\nPace nella scuola e nella fabbrica\nNella politica e nello sport\nPace in famiglia, pace in automobile\nPace nella chiesa\n\nPace, pace, pace!",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/d/d9/Pachelbel%27s_Canon.ogg",
        moments: &[Moment::Pace],
    },
    SeedSong {
        title: "Pane di Vita",
        description: "A hymn celebrating the bread of life, perfect for communion or thanksgiving.",
        lyrics: "Pane di vita sei\nSpezzato per tutti noi\nChi ne mangia per sempre in Te vivrà\nVieni e sazia la fame che c'è\n\nVino di salvezza sei\nVersato per tutti noi\nChi ne beve per sempre in Te vivrà\nVieni e sazia la sete che c'è",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/2/2b/Hungarian-dance-no-5.ogg",
        moments: &[Moment::Comunione, Moment::Ringraziamento],
    },
    SeedSong {
        title: "Magnificat",
        description: "Mary's canticle of praise, beautiful for thanksgiving or end of ceremony.",
        lyrics: "L'anima mia magnifica il Signore\nE il mio spirito esulta in Dio, mio salvatore\nPerché ha guardato l'umiltà della sua serva\nD'ora in poi tutte le generazioni mi chiameranno beata\n\nGrandi cose ha fatto in me l'Onnipotente\nE Santo è il suo nome\nDi generazione in generazione la sua misericordia\nSi stende su quelli che lo temono",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/1/1e/Bach_-_Air_on_the_G_String.ogg",
        moments: &[Moment::Ringraziamento, Moment::Fine],
    },
    SeedSong {
        title: "Resta Qui Con Noi",
        description: "A joyful song asking the Lord to remain with us, perfect for the end of ceremony.",
        lyrics: "Le ombre si distendono scende ormai la sera\nE s'allontanano dietro i monti\nI riflessi di un giorno che non finirà\nDi un giorno che ora correrà sempre\nPerché sappiamo che una nuova vita\nDa qui è partita e mai più si fermerà\n\nResta qui con noi il sole scende già\nResta qui con noi Signore è sera ormai\nResta qui con noi il sole scende già\nSe tu sei fra noi la notte non verrà",
        audio_url: "https://upload.wikimedia.org/wikipedia/commons/b/bc/Vivaldi_-_Winter_%28Four_Seasons%29.ogg",
        moments: &[Moment::Fine],
    },
];
